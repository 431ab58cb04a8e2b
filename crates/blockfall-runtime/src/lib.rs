//! Async runtime for blockfall games.
//!
//! [`GameDriver`] owns a [`GameEngine`](blockfall_engine::GameEngine) and a
//! [`ResetTimer`], merges timer ticks with player moves, and publishes a
//! [`Snapshot`](blockfall_engine::Snapshot) after every change.

pub use self::{
    driver::{DriverExit, ExitReason, GameDriver},
    timer::ResetTimer,
};

mod driver;
mod event;
mod timer;
