pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Checked grid access failed.
///
/// Both variants signal a caller bug: the engine itself never produces them while
/// playing, because every cell it touches has already been projected into bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridError {
    #[display("cell ({x}, {y}) is outside the grid")]
    OutOfBounds { x: i32, y: i32 },
    #[display("invalid tile color index {index}")]
    InvalidColor { index: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EngineError {
    #[display("game is already over")]
    GameOver,
    #[display("move {mv:?} is only accepted in debug mode")]
    MoveRejected { mv: Move },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("starting level must be between 1 and 20, got {level}")]
    LevelOutOfRange { level: u8 },
}
