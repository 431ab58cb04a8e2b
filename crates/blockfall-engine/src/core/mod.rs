pub use self::{active_piece::*, grid::*, piece::*};

pub(crate) mod active_piece;
pub(crate) mod grid;
pub(crate) mod piece;

/// Number of columns in the grid.
pub const GRID_WIDTH: usize = 10;
/// Number of rows in the grid, including the buffer rows above the visible field.
pub const GRID_HEIGHT: usize = 40;
/// Number of rows visible to the player, counted from the bottom.
pub const VISIBLE_HEIGHT: usize = 20;
/// A piece locked with a cell in this row ends the game.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const GAME_OVER_ROW: i32 = VISIBLE_HEIGHT as i32;
