use serde::{Deserialize, Serialize};

use crate::GridError;

use super::{GRID_HEIGHT, GRID_WIDTH, VISIBLE_HEIGHT, active_piece::Position};

/// Color of a single grid cell.
///
/// `Empty` doubles as "unoccupied". The seven other values are palette indices;
/// what they look like is up to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileColor {
    #[default]
    Empty = 0,
    Color1 = 1,
    Color2 = 2,
    Color3 = 3,
    Color4 = 4,
    Color5 = 5,
    Color6 = 6,
    Color7 = 7,
}

impl TileColor {
    /// Every valid color, ordered by index.
    pub const ALL: [Self; 8] = [
        TileColor::Empty,
        TileColor::Color1,
        TileColor::Color2,
        TileColor::Color3,
        TileColor::Color4,
        TileColor::Color5,
        TileColor::Color6,
        TileColor::Color7,
    ];

    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, TileColor::Empty)
    }

    const fn as_char(self) -> char {
        (b'0' + self as u8) as char
    }

    fn from_char(ch: char) -> Option<Self> {
        let digit = u8::try_from(ch.to_digit(10)?).ok()?;
        Self::try_from(digit).ok()
    }
}

impl TryFrom<u8> for TileColor {
    type Error = GridError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(index))
            .copied()
            .ok_or(GridError::InvalidColor { index })
    }
}

/// One horizontal line of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRow {
    cells: [TileColor; GRID_WIDTH],
}

impl GridRow {
    pub const EMPTY: Self = Self {
        cells: [TileColor::Empty; GRID_WIDTH],
    };

    #[must_use]
    pub fn cells(&self) -> &[TileColor; GRID_WIDTH] {
        &self.cells
    }

    /// Returns `true` when no column of the row is empty.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_empty())
    }
}

/// The playing field: a fixed 10×40 matrix of colored cells.
///
/// # Coordinate System
///
/// - (0, 0) is the bottom-left cell
/// - X increases rightward (columns `0..10`)
/// - Y increases upward (rows `0..40`)
/// - Rows `0..20` are visible; rows `20..40` are the buffer where pieces spawn
///
/// The grid holds both locked tiles and the cells of the falling piece; the
/// controller paints and erases the latter as the piece moves.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Grid, TileColor};
///
/// let mut grid = Grid::EMPTY;
/// grid.set(TileColor::Color3, 4, 0).unwrap();
/// assert_eq!(grid.get(4, 0).unwrap(), TileColor::Color3);
/// assert!(grid.get(10, 0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    // rows[0] is the bottom row
    rows: [GridRow; GRID_HEIGHT],
}

impl Default for Grid {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "0000000000,0001100000,..." (rows top to bottom, one digit per cell)
        let mut s = String::with_capacity(GRID_HEIGHT * (GRID_WIDTH + 1));
        for (i, row) in self.rows.iter().rev().enumerate() {
            if i > 0 {
                s.push(',');
            }
            s.extend(row.cells.iter().map(|cell| cell.as_char()));
        }
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != GRID_HEIGHT {
            return Err(serde::de::Error::custom(format!(
                "expected {GRID_HEIGHT} comma-separated rows, got {}",
                parts.len()
            )));
        }

        let mut grid = Self::EMPTY;
        for (y, part) in parts.iter().rev().enumerate() {
            let cells = part
                .chars()
                .map(TileColor::from_char)
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid cell color in row {y}: {part}"))
                })?;
            if cells.len() != GRID_WIDTH {
                return Err(serde::de::Error::custom(format!(
                    "expected {GRID_WIDTH} cells in row {y}, got {}",
                    cells.len()
                )));
            }
            grid.rows[y].cells.copy_from_slice(&cells);
        }
        Ok(grid)
    }
}

impl Grid {
    pub const WIDTH: usize = GRID_WIDTH;
    pub const HEIGHT: usize = GRID_HEIGHT;
    pub const VISIBLE_HEIGHT: usize = VISIBLE_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [GridRow::EMPTY; GRID_HEIGHT],
    };

    fn index(x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok().filter(|&x| x < GRID_WIDTH)?;
        let y = usize::try_from(y).ok().filter(|&y| y < GRID_HEIGHT)?;
        Some((x, y))
    }

    pub fn get(&self, x: i32, y: i32) -> Result<TileColor, GridError> {
        let (col, row) = Self::index(x, y).ok_or(GridError::OutOfBounds { x, y })?;
        Ok(self.rows[row].cells[col])
    }

    pub fn set(&mut self, color: TileColor, x: i32, y: i32) -> Result<(), GridError> {
        let (col, row) = Self::index(x, y).ok_or(GridError::OutOfBounds { x, y })?;
        self.rows[row].cells[col] = color;
        Ok(())
    }

    /// Returns `true` if the cell exists and holds no tile.
    ///
    /// Cells outside the grid are never empty: nothing can be placed there.
    #[must_use]
    pub fn is_empty(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_ok_and(TileColor::is_empty)
    }

    /// Resets every cell to [`TileColor::Empty`].
    pub fn clear(&mut self) {
        self.rows.fill(GridRow::EMPTY);
    }

    /// Returns the row at index `y` (0 is the bottom row).
    ///
    /// # Panics
    ///
    /// Panics if `y` is not below [`Grid::HEIGHT`].
    #[must_use]
    pub fn row(&self, y: usize) -> &GridRow {
        &self.rows[y]
    }

    /// Returns an iterator over all rows, bottom to top.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &GridRow> + ExactSizeIterator {
        self.rows.iter()
    }

    /// Returns the indices of completely filled rows, bottom to top.
    #[must_use]
    pub fn full_lines(&self) -> Vec<usize> {
        (0..GRID_HEIGHT)
            .filter(|&y| self.rows[y].is_filled())
            .collect()
    }

    /// Removes every full line and drops the rows above it.
    ///
    /// Lines are processed from the topmost down: removing a lower line first
    /// would shift the remaining full lines away from their recorded indices.
    ///
    /// # Returns
    ///
    /// The number of lines removed.
    pub fn collapse(&mut self) -> usize {
        let full_lines = self.full_lines();
        for &y in full_lines.iter().rev() {
            self.rows.copy_within(y + 1.., y);
            self.rows[GRID_HEIGHT - 1] = GridRow::EMPTY;
        }
        full_lines.len()
    }

    /// Returns the number of non-empty cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .filter(|cell| !cell.is_empty())
            .count()
    }

    /// Writes a cell the caller has already proven to be inside the grid.
    ///
    /// # Panics
    ///
    /// Panics if `position` is outside the grid.
    pub(crate) fn paint(&mut self, position: Position, color: TileColor) {
        let (col, row) = Self::index(position.x, position.y)
            .unwrap_or_else(|| panic!("painting outside the grid at {position:?}"));
        self.rows[row].cells[col] = color;
    }

    /// Creates a `Grid` from ASCII art for testing.
    ///
    /// `.` is empty, `#` is [`TileColor::Color1`] and the digits `1`-`7` select a
    /// color. Lines are given top to bottom; the last line is row 0.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut grid = Self::EMPTY;
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        assert!(
            lines.len() <= GRID_HEIGHT,
            "At most {GRID_HEIGHT} rows are allowed, got {}",
            lines.len()
        );

        for (y, line) in lines.iter().rev().enumerate() {
            let cells: Vec<TileColor> = line
                .chars()
                .filter_map(|ch| match ch {
                    '.' => Some(TileColor::Empty),
                    '#' => Some(TileColor::Color1),
                    _ => TileColor::from_char(ch),
                })
                .collect();
            assert_eq!(
                cells.len(),
                GRID_WIDTH,
                "Each row must have exactly {GRID_WIDTH} cells, got {} at row {y}",
                cells.len(),
            );
            grid.rows[y].cells.copy_from_slice(&cells);
        }
        grid
    }
}
