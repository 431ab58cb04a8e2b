use serde::{Deserialize, Serialize};

use crate::{ActivePiece, Grid, Shape};

/// A copy of everything a renderer needs to draw one frame.
///
/// Snapshots own their data; nothing in them changes when the engine moves on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub(crate) score: u64,
    pub(crate) level: u8,
    pub(crate) lines: usize,
    pub(crate) lines_to_next_level: i32,
    pub(crate) ticks: u64,
    pub(crate) grid: Grid,
    pub(crate) current_shape: Option<Shape>,
    pub(crate) next_shape: Shape,
    pub(crate) active_piece: Option<ActivePiece>,
    pub(crate) game_over: bool,
}

impl Snapshot {
    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub fn level(&self) -> u8 {
        self.level
    }

    #[must_use]
    pub fn lines(&self) -> usize {
        self.lines
    }

    #[must_use]
    pub fn lines_to_next_level(&self) -> i32 {
        self.lines_to_next_level
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The grid, including the cells of the falling piece.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Shape of the falling piece; `None` between a line clear and the next spawn, and after the game ends.
    #[must_use]
    pub fn current_shape(&self) -> Option<Shape> {
        self.current_shape
    }

    #[must_use]
    pub fn next_shape(&self) -> Shape {
        self.next_shape
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<ActivePiece> {
        self.active_piece
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }
}
