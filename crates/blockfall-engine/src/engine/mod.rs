//! Game rules built on top of the core data structures.
//!
//! - [`PieceController`] - Falling piece against the grid: movement, rotation, locking
//! - [`GameEngine`] - Full game: score keeping, shape supply, snapshots
//! - [`GameStats`] - Score, level, lines and tick counter
//! - [`ShapeSource`] - Seeded, endless shape stream
//! - [`GameConfig`] - Starting level and debug mode
//!
//! # Game Flow
//!
//! 1. Create a [`GameEngine`] from a [`GameConfig`] and a seed
//! 2. Feed it [`Move`]s, from the player and from the drop timer
//! 3. After each move, hand a [`Snapshot`] to whoever draws the game
//! 4. Stop when [`GameEngine::apply`] reports game over
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{GameConfig, GameEngine, Move, ShapeSeed};
//!
//! let mut engine = GameEngine::with_seed(GameConfig::default(), ShapeSeed::from(42_u64));
//!
//! engine.apply(Move::Left).unwrap();
//! engine.apply(Move::RotateRight).unwrap();
//!
//! while !engine.is_game_over() {
//!     engine.apply(Move::HardDrop).unwrap();
//! }
//! assert!(engine.snapshot().is_game_over());
//! ```

pub use self::{
    config::*, controller::*, game_engine::*, game_stats::*, shape_source::*, snapshot::*,
};

mod config;
mod controller;
mod game_engine;
mod game_stats;
mod shape_source;
mod snapshot;
