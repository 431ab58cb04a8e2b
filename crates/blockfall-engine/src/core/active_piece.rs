use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::{
    GRID_HEIGHT, GRID_WIDTH,
    grid::Grid,
    piece::{Piece, Rotation, RotationDirection, Shape},
};

/// Grid coordinates of a mask origin or of a single cell.
///
/// Coordinates are signed: a piece being rotated against a wall may
/// momentarily stick out of the grid before the wall kick brings it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Where new pieces enter the grid, inside the buffer above the visible rows.
    pub const SPAWN: Self = Self::new(4, 23);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// One-cell movement directions. `Up` is toward higher rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// A piece placed on the grid.
///
/// The position is the grid cell of the mask's top-left corner. Mask rows grow
/// downward while grid rows grow upward, so a mask cell at `(dx, dy)` lands on
/// grid cell `(x + dx, y - dy)`.
///
/// Active pieces are values: moving or rotating returns a new `ActivePiece` and
/// never touches the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    piece: Piece,
    position: Position,
}

impl Serialize for ActivePiece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "shape#rotation@x,y" (e.g., "S#1@4,23")
        let s = format!(
            "{}#{}@{},{}",
            self.piece.shape().as_char(),
            self.piece.rotation().index(),
            self.position.x,
            self.position.y
        );
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for ActivePiece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let (shape_str, rest) = s.split_once('#').ok_or_else(|| {
            serde::de::Error::custom(format!(
                "missing '#' in format 'shape#rotation@x,y', got '{s}'"
            ))
        })?;
        let (rotation_str, position_str) = rest.split_once('@').ok_or_else(|| {
            serde::de::Error::custom(format!(
                "missing '@' in format 'shape#rotation@x,y', got '{s}'"
            ))
        })?;
        let (x_str, y_str) = position_str.split_once(',').ok_or_else(|| {
            serde::de::Error::custom(format!(
                "missing ',' in format 'shape#rotation@x,y', got '{s}'"
            ))
        })?;

        let mut chars = shape_str.chars();
        let shape = match (chars.next(), chars.next()) {
            (Some(c), None) => Shape::from_char(c)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid shape: {c}")))?,
            _ => {
                return Err(serde::de::Error::custom(format!(
                    "shape must be a single character, got '{shape_str}'"
                )));
            }
        };

        let rotation = rotation_str
            .parse::<u8>()
            .ok()
            .and_then(Rotation::from_index)
            .ok_or_else(|| {
                serde::de::Error::custom(format!("rotation must be 0-3, got '{rotation_str}'"))
            })?;

        let x = x_str
            .parse::<i32>()
            .map_err(|e| serde::de::Error::custom(format!("invalid x position: {x_str} ({e})")))?;
        let y = y_str
            .parse::<i32>()
            .map_err(|e| serde::de::Error::custom(format!("invalid y position: {y_str} ({e})")))?;

        Ok(ActivePiece::new(
            Piece::with_rotation(shape, rotation),
            Position::new(x, y),
        ))
    }
}

impl ActivePiece {
    #[must_use]
    pub const fn new(piece: Piece, position: Position) -> Self {
        Self { piece, position }
    }

    /// Places a fresh piece of `shape` at the spawn position.
    #[must_use]
    pub const fn spawn(shape: Shape) -> Self {
        Self::new(Piece::new(shape), Position::SPAWN)
    }

    #[must_use]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.piece.shape()
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Returns the grid cells covered by the piece.
    pub fn cells(self) -> impl Iterator<Item = Position> {
        self.piece
            .mask()
            .offsets()
            .map(move |(dx, dy)| self.position.offset(dx, -dy))
    }

    #[must_use]
    pub fn cell_array(self) -> ArrayVec<Position, 4> {
        self.cells().collect()
    }

    #[must_use]
    pub const fn shifted(self, dx: i32, dy: i32) -> Self {
        Self::new(self.piece, self.position.offset(dx, dy))
    }

    #[must_use]
    pub const fn moved(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.shifted(dx, dy)
    }

    #[must_use]
    pub const fn rotated(self, direction: RotationDirection) -> Self {
        Self::new(self.piece.rotated(direction), self.position)
    }

    /// Returns `true` if the piece, currently painted on `grid`, can move one
    /// cell in `direction`.
    ///
    /// Every projected cell must be inside the grid and either empty or one of
    /// the piece's own cells.
    #[must_use]
    pub fn can_move(self, direction: Direction, grid: &Grid) -> bool {
        let own = self.cell_array();
        self.moved(direction)
            .cells()
            .all(|cell| own.contains(&cell) || grid.is_empty(cell.x, cell.y))
    }

    /// Returns `true` if every cell is inside the grid and empty.
    #[must_use]
    pub fn fits(self, grid: &Grid) -> bool {
        self.cells().all(|cell| grid.is_empty(cell.x, cell.y))
    }

    /// Returns the shift that brings the piece back inside the grid.
    ///
    /// Each axis is handled independently: if the piece sticks out past the
    /// low edge it is pushed up by the overflow, otherwise it is pulled back
    /// from the high edge (a zero shift when it already fits).
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn wall_kick_offset(self) -> (i32, i32) {
        let max_col = GRID_WIDTH as i32 - 1;
        let max_row = GRID_HEIGHT as i32 - 1;
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (0, max_col, 0, max_row);
        for cell in self.cells() {
            min_x = min_x.min(cell.x);
            max_x = max_x.max(cell.x);
            min_y = min_y.min(cell.y);
            max_y = max_y.max(cell.y);
        }
        let dx = if min_x < 0 { -min_x } else { max_col - max_x };
        let dy = if min_y < 0 { -min_y } else { max_row - max_y };
        (dx, dy)
    }

    #[must_use]
    pub fn wall_kicked(self) -> Self {
        let (dx, dy) = self.wall_kick_offset();
        self.shifted(dx, dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::TileColor;

    fn sorted_cells(piece: ActivePiece) -> Vec<(i32, i32)> {
        let mut cells: Vec<_> = piece.cells().map(|p| (p.x, p.y)).collect();
        cells.sort_unstable();
        cells
    }

    #[test]
    fn test_spawn_cells() {
        assert_eq!(
            sorted_cells(ActivePiece::spawn(Shape::T)),
            [(4, 22), (5, 21), (5, 22), (6, 22)]
        );
        assert_eq!(
            sorted_cells(ActivePiece::spawn(Shape::Square)),
            [(4, 22), (4, 23), (5, 22), (5, 23)]
        );
        assert_eq!(
            sorted_cells(ActivePiece::spawn(Shape::Line)),
            [(5, 20), (5, 21), (5, 22), (5, 23)]
        );
    }

    #[test]
    fn test_moved_shifts_every_cell() {
        let piece = ActivePiece::spawn(Shape::L);
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            let (dx, dy) = direction.delta();
            let expected: Vec<_> = sorted_cells(piece)
                .into_iter()
                .map(|(x, y)| (x + dx, y + dy))
                .collect();
            assert_eq!(sorted_cells(piece.moved(direction)), expected);
        }
    }

    #[test]
    fn test_can_move_respects_walls() {
        let grid = Grid::EMPTY;
        let piece = ActivePiece::new(Piece::new(Shape::Square), Position::new(0, 1));
        assert!(!piece.can_move(Direction::Left, &grid));
        assert!(!piece.can_move(Direction::Down, &grid));
        assert!(piece.can_move(Direction::Right, &grid));
        assert!(piece.can_move(Direction::Up, &grid));

        let piece = ActivePiece::new(Piece::new(Shape::Square), Position::new(8, 39));
        assert!(!piece.can_move(Direction::Right, &grid));
        assert!(!piece.can_move(Direction::Up, &grid));
    }

    #[test]
    fn test_can_move_around_horizontal_obstacle() {
        let mut grid = Grid::EMPTY;
        for x in 4..8 {
            grid.set(TileColor::Color1, x, 4).unwrap();
        }
        // Vertical line in column 4, bottom cell directly above the obstacle.
        let piece = ActivePiece::new(Piece::new(Shape::Line), Position::new(3, 8));

        let cases = [
            (Direction::Up, true),
            (Direction::Left, true),
            (Direction::Right, true),
            (Direction::Down, false),
        ];
        for (direction, expected) in cases {
            assert_eq!(piece.can_move(direction, &grid), expected, "{direction:?}");
        }
    }

    #[test]
    fn test_can_move_outside_grid_fails() {
        let grid = Grid::EMPTY;
        for position in [
            Position::new(-100, 0),
            Position::new(100, 0),
            Position::new(0, 100),
            Position::new(0, -100),
        ] {
            let piece = ActivePiece::new(Piece::new(Shape::Line), position);
            assert!(!piece.can_move(Direction::Up, &grid), "{position:?}");
        }

        let piece = ActivePiece::new(Piece::new(Shape::Line), Position::new(0, 3));
        assert!(!piece.can_move(Direction::Down, &grid));
    }

    #[test]
    fn test_can_move_ignores_own_cells() {
        let mut grid = Grid::EMPTY;
        let piece = ActivePiece::new(Piece::new(Shape::Line), Position::new(3, 10));
        for cell in piece.cells() {
            grid.paint(cell, Shape::Line.color());
        }
        assert!(piece.can_move(Direction::Down, &grid));
        assert!(piece.can_move(Direction::Up, &grid));

        grid.set(TileColor::Color2, 4, 6).unwrap();
        assert!(!piece.can_move(Direction::Down, &grid));
        // A painted piece never "fits" its own cells; only can_move excludes them.
        assert!(!piece.fits(&grid));
    }

    #[test]
    fn test_wall_kick_offset() {
        let horizontal = ActivePiece::new(
            Piece::new(Shape::Line).rotated_right(),
            Position::new(-1, 10),
        );
        assert_eq!(horizontal.wall_kick_offset(), (1, 0));
        assert!(horizontal.wall_kicked().fits(&Grid::EMPTY));

        let horizontal = horizontal.shifted(9, 0);
        assert_eq!(horizontal.wall_kick_offset(), (-2, 0));

        let vertical = ActivePiece::new(Piece::new(Shape::Line), Position::new(4, 2));
        assert_eq!(vertical.wall_kick_offset(), (0, 1));

        let inside = ActivePiece::spawn(Shape::Z);
        assert_eq!(inside.wall_kick_offset(), (0, 0));
    }

    #[test]
    fn test_active_piece_serialization() {
        let piece = ActivePiece::new(
            Piece::new(Shape::S).rotated_right(),
            Position::new(4, 23),
        );

        let serialized = serde_json::to_string(&piece).unwrap();
        assert_eq!(serialized, "\"S#1@4,23\"");

        let deserialized: ActivePiece = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, piece);

        let kicked: ActivePiece = serde_json::from_str("\"I#1@-1,10\"").unwrap();
        assert_eq!(kicked.position(), Position::new(-1, 10));
    }

    #[test]
    fn test_active_piece_deserialization_error_cases() {
        assert!(serde_json::from_str::<ActivePiece>("\"S1@4,18\"").is_err());
        assert!(serde_json::from_str::<ActivePiece>("\"S#1#4,18\"").is_err());
        assert!(serde_json::from_str::<ActivePiece>("\"S#1@4\"").is_err());
        assert!(serde_json::from_str::<ActivePiece>("\"X#1@4,18\"").is_err());
        assert!(serde_json::from_str::<ActivePiece>("\"SS#1@4,18\"").is_err());
        assert!(serde_json::from_str::<ActivePiece>("\"S#4@4,18\"").is_err());
        assert!(serde_json::from_str::<ActivePiece>("\"S#1@abc,18\"").is_err());
    }
}
