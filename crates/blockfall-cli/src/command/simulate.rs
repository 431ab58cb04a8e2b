use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{GameConfig, GameEngine, GameSummary, Move, ShapeSeed};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{command::GameArgs, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Stop after this many moves if the game has not ended
    #[clap(long, default_value_t = 100_000)]
    max_moves: u64,
    /// Write the report to this file instead of stdout
    #[clap(long)]
    output: Option<PathBuf>,
}

/// Moves picked uniformly by the simulated player.
const MOVES: [Move; 7] = [
    Move::Left,
    Move::Right,
    Move::Down,
    Move::RotateLeft,
    Move::RotateRight,
    Move::ForceDown,
    Move::HardDrop,
];

const DEBUG_MOVES: [Move; 8] = [
    Move::Left,
    Move::Right,
    Move::Up,
    Move::Down,
    Move::RotateLeft,
    Move::RotateRight,
    Move::ForceDown,
    Move::HardDrop,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct SimulationReport {
    seed: ShapeSeed,
    config: GameConfig,
    moves: u64,
    summary: GameSummary,
}

pub(crate) fn run(game: &GameArgs, arg: &SimulateArg) -> anyhow::Result<()> {
    let config = game.game_config()?;
    let seed = game.seed();
    if config.debug() {
        eprintln!("Debug mode: the simulated player may move pieces up");
    }

    let report = simulate(config, seed, arg.max_moves)?;
    Output::save_json(&report, arg.output.clone())
}

/// Plays random moves until the game ends or `max_moves` have been applied.
///
/// Both the shape sequence and the move sequence derive from `seed`, so the
/// report is reproducible.
fn simulate(
    config: GameConfig,
    seed: ShapeSeed,
    max_moves: u64,
) -> anyhow::Result<SimulationReport> {
    let mut engine = GameEngine::with_seed(config, seed);
    let mut rng = Pcg32::from_seed(move_seed(seed));
    let moves: &[Move] = if config.debug() { &DEBUG_MOVES } else { &MOVES };

    let mut played = 0;
    while played < max_moves && !engine.is_game_over() {
        let mv = moves[rng.random_range(0..moves.len())];
        engine
            .apply(mv)
            .with_context(|| format!("Move {played} ({mv:?}) was rejected"))?;
        played += 1;
    }

    Ok(SimulationReport {
        seed,
        config,
        moves: played,
        summary: engine.summary(),
    })
}

/// Seed for the move picker, kept apart from the shape stream.
fn move_seed(seed: ShapeSeed) -> [u8; 16] {
    let mut bytes = seed.to_bytes();
    bytes.reverse();
    for byte in &mut bytes {
        *byte ^= 0x5a;
    }
    bytes
}
