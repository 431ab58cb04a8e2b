use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::grid::TileColor;

/// A piece of the catalog in one of its four orientations.
///
/// Pieces carry no position; see [`ActivePiece`](super::ActivePiece) for a piece
/// placed on the grid. Rotating only changes the rotation index, the masks
/// themselves are shared by every piece of the same shape.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, Shape};
///
/// let piece = Piece::new(Shape::T);
/// let turned = piece.rotated_right().rotated_left();
/// assert_eq!(turned, piece);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    shape: Shape,
    rotation: Rotation,
}

impl Piece {
    #[must_use]
    pub const fn new(shape: Shape) -> Self {
        Self {
            shape,
            rotation: Rotation::SPAWN,
        }
    }

    #[must_use]
    pub const fn with_rotation(shape: Shape, rotation: Rotation) -> Self {
        Self { shape, rotation }
    }

    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[must_use]
    pub fn mask(&self) -> &'static ShapeMask {
        self.shape.mask(self.rotation)
    }

    #[must_use]
    pub const fn rotated_right(self) -> Self {
        Self {
            shape: self.shape,
            rotation: self.rotation.rotated_right(),
        }
    }

    #[must_use]
    pub const fn rotated_left(self) -> Self {
        Self {
            shape: self.shape,
            rotation: self.rotation.rotated_left(),
        }
    }

    #[must_use]
    pub const fn rotated(self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Left => self.rotated_left(),
            RotationDirection::Right => self.rotated_right(),
        }
    }
}

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationDirection {
    /// Counterclockwise.
    Left,
    /// Clockwise.
    Right,
}

impl RotationDirection {
    /// Returns the turn that undoes this one.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            RotationDirection::Left => RotationDirection::Right,
            RotationDirection::Right => RotationDirection::Left,
        }
    }
}

/// Rotation state of a piece.
///
/// Represents one of four rotation states:
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
///
/// Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rotation(u8);

impl Rotation {
    pub const SPAWN: Self = Rotation(0);

    /// Returns the rotation with the given index, or `None` if it is not in `0..4`.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 4 { Some(Rotation(index)) } else { None }
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn rotated_right(self) -> Self {
        Rotation((self.0 + 1) % 4)
    }

    #[must_use]
    pub const fn rotated_left(self) -> Self {
        Rotation((self.0 + 3) % 4)
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// The seven tetromino shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum Shape {
    /// 2×2 block.
    Square = 0,
    S = 1,
    Z = 2,
    L = 3,
    T = 4,
    J = 5,
    /// Four in a row.
    Line = 6,
}

impl Distribution<Shape> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Shape {
        Shape::ALL[rng.random_range(0..Shape::LEN)]
    }
}

impl Shape {
    /// Number of shapes (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Shape::Square,
        Shape::S,
        Shape::Z,
        Shape::L,
        Shape::T,
        Shape::J,
        Shape::Line,
    ];

    /// Side length of the square the shape's masks are defined over.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Shape::Square => 2,
            Shape::Line => 4,
            Shape::S | Shape::Z | Shape::L | Shape::T | Shape::J => 3,
        }
    }

    /// Color the shape's tiles are painted with.
    #[must_use]
    pub const fn color(self) -> TileColor {
        match self {
            Shape::Square => TileColor::Color1,
            Shape::S => TileColor::Color2,
            Shape::Z => TileColor::Color3,
            Shape::L => TileColor::Color4,
            Shape::T => TileColor::Color5,
            Shape::J => TileColor::Color6,
            Shape::Line => TileColor::Color7,
        }
    }

    #[must_use]
    pub fn mask(self, rotation: Rotation) -> &'static ShapeMask {
        &SHAPE_MASKS[self as usize][rotation.as_usize()]
    }

    /// Returns the single character representation of this shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::Shape;
    ///
    /// assert_eq!(Shape::Square.as_char(), 'O');
    /// assert_eq!(Shape::Line.as_char(), 'I');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Shape::Square => 'O',
            Shape::S => 'S',
            Shape::Z => 'Z',
            Shape::L => 'L',
            Shape::T => 'T',
            Shape::J => 'J',
            Shape::Line => 'I',
        }
    }

    /// Parses a shape from the character returned by [`Shape::as_char`].
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'O' => Some(Shape::Square),
            'S' => Some(Shape::S),
            'Z' => Some(Shape::Z),
            'L' => Some(Shape::L),
            'T' => Some(Shape::T),
            'J' => Some(Shape::J),
            'I' => Some(Shape::Line),
            _ => None,
        }
    }
}

/// Occupancy of one rotation state over the shape's `size`×`size` square.
///
/// Row 0 is the top of the piece. Cells outside `size` are always `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMask {
    size: usize,
    cells: [[bool; 4]; 4],
}

impl ShapeMask {
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the mask is occupied at `row`, `col`.
    #[must_use]
    pub const fn is_set(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.cells[row][col]
    }

    /// Returns the `(dx, dy)` offsets of the occupied cells, where `dy` counts rows
    /// downward from the top of the mask.
    pub fn offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.size).flat_map(move |row| {
            (0..self.size)
                .filter(move |&col| self.cells[row][col])
                .map(move |col| (mask_index(col), mask_index(row)))
        })
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn mask_index(i: usize) -> i32 {
    i as i32
}

/// Turns a mask a quarter turn clockwise: `new[row][col] = old[size - 1 - col][row]`.
const fn pivot(mask: &ShapeMask) -> ShapeMask {
    let size = mask.size;
    let mut cells = [[false; 4]; 4];
    let mut row = 0;
    while row < size {
        let mut col = 0;
        while col < size {
            cells[row][col] = mask.cells[size - 1 - col][row];
            col += 1;
        }
        row += 1;
    }
    ShapeMask { size, cells }
}

/// Generates all 4 rotation states of a shape from its spawn orientation.
const fn mask_rotations(size: usize, cells: [[bool; 4]; 4]) -> [ShapeMask; 4] {
    let spawn = ShapeMask { size, cells };
    let mut rotations = [spawn; 4];
    let mut i = 1;
    while i < 4 {
        rotations[i] = pivot(&rotations[i - 1]);
        i += 1;
    }
    rotations
}

static SHAPE_MASKS: [[ShapeMask; 4]; Shape::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];

    [
        // Square
        mask_rotations(2, [[C, C, E, E], [C, C, E, E], EEEE, EEEE]),
        // S
        mask_rotations(3, [EEEE, [E, C, C, E], [C, C, E, E], EEEE]),
        // Z
        mask_rotations(3, [EEEE, [C, C, E, E], [E, C, C, E], EEEE]),
        // L
        mask_rotations(3, [[E, C, E, E], [E, C, E, E], [E, C, C, E], EEEE]),
        // T
        mask_rotations(3, [EEEE, [C, C, C, E], [E, C, E, E], EEEE]),
        // J
        mask_rotations(3, [[E, C, E, E], [E, C, E, E], [C, C, E, E], EEEE]),
        // Line
        mask_rotations(4, [[E, C, E, E], [E, C, E, E], [E, C, E, E], [E, C, E, E]]),
    ]
};

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn render(mask: &ShapeMask) -> Vec<String> {
        (0..mask.size())
            .map(|row| {
                (0..mask.size())
                    .map(|col| if mask.is_set(row, col) { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_every_mask_has_four_cells() {
        for shape in Shape::ALL {
            let mut rotation = Rotation::SPAWN;
            for _ in 0..4 {
                assert_eq!(
                    shape.mask(rotation).offsets().count(),
                    4,
                    "{shape:?} rotation {}",
                    rotation.index()
                );
                rotation = rotation.rotated_right();
            }
        }
    }

    #[test]
    fn test_four_turns_restore_mask() {
        for shape in Shape::ALL {
            let piece = Piece::new(shape);
            let mut right = piece;
            let mut left = piece;
            for _ in 0..4 {
                right = right.rotated_right();
                left = left.rotated_left();
            }
            assert_eq!(right, piece);
            assert_eq!(left, piece);
            assert_eq!(right.mask(), piece.mask());
        }
    }

    #[test]
    fn test_left_undoes_right() {
        for shape in Shape::ALL {
            let mut piece = Piece::new(shape);
            for _ in 0..4 {
                assert_eq!(piece.rotated_right().rotated_left(), piece);
                assert_eq!(
                    piece
                        .rotated(RotationDirection::Left)
                        .rotated(RotationDirection::Left.inverse()),
                    piece
                );
                piece = piece.rotated_right();
            }
        }
    }

    #[test]
    fn test_right_turn_is_clockwise() {
        let piece = Piece::new(Shape::T);
        assert_eq!(render(piece.mask()), ["...", "###", ".#."]);
        assert_eq!(render(piece.rotated_right().mask()), [".#.", "##.", ".#."]);
        assert_eq!(render(piece.rotated_left().mask()), [".#.", ".##", ".#."]);

        let line = Piece::new(Shape::Line);
        assert_eq!(render(line.mask()), [".#..", ".#..", ".#..", ".#.."]);
        assert_eq!(
            render(line.rotated_right().mask()),
            ["....", "####", "....", "...."]
        );
    }

    #[test]
    fn test_square_rotations_are_identical() {
        let square = Piece::new(Shape::Square);
        let mut piece = square;
        for _ in 0..4 {
            piece = piece.rotated_right();
            assert_eq!(piece.mask(), square.mask());
        }
    }

    #[test]
    fn test_shape_colors_are_distinct() {
        let colors: Vec<_> = Shape::ALL.iter().map(|shape| shape.color()).collect();
        for (i, color) in colors.iter().enumerate() {
            assert!(!color.is_empty());
            assert!(!colors[i + 1..].contains(color), "{color:?} is reused");
        }
    }

    #[test]
    fn test_shape_char_conversion() {
        for shape in Shape::ALL {
            assert_eq!(Shape::from_char(shape.as_char()), Some(shape));
        }
        assert_eq!(Shape::from_char('X'), None);
        assert_eq!(Shape::from_char('t'), None);
    }

    #[test]
    fn test_rotation_from_index() {
        assert_eq!(Rotation::from_index(3).map(Rotation::index), Some(3));
        assert_eq!(Rotation::from_index(4), None);
    }

    #[test]
    fn test_shape_distribution_is_uniform() {
        const SAMPLES: usize = 7000;
        let mut rng = Pcg32::seed_from_u64(42);
        let mut counts = [0_usize; Shape::LEN];
        for _ in 0..SAMPLES {
            let shape: Shape = rng.random();
            counts[shape as usize] += 1;
        }
        let expected = SAMPLES / Shape::LEN;
        for (shape, count) in Shape::ALL.iter().zip(counts) {
            assert!(
                count.abs_diff(expected) * 100 < expected * 35,
                "{shape:?} drawn {count} times, expected about {expected}"
            );
        }
    }
}
