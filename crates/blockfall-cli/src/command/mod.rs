use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{GameConfig, ShapeSeed};
use clap::{Parser, Subcommand};

use crate::util;

mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[clap(flatten)]
    game: GameArgs,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play interactively in the terminal
    Play(#[clap(flatten)] play::PlayArg),
    /// Run a seeded game without a terminal and print its summary as JSON
    Simulate(#[clap(flatten)] simulate::SimulateArg),
}

/// Game settings shared by every mode.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GameArgs {
    /// Starting level (1-20) [default: 1]
    #[clap(long, global = true)]
    level: Option<u8>,
    /// Disable automatic descent and allow moving pieces up
    #[clap(long, global = true)]
    debug: bool,
    /// Seed for the shape sequence, as 32 hex digits [default: random]
    #[clap(long, global = true)]
    seed: Option<ShapeSeed>,
    /// JSON file with game settings; `--level` and `--debug` override it
    #[clap(long, global = true)]
    config: Option<PathBuf>,
}

impl GameArgs {
    pub(crate) fn game_config(&self) -> anyhow::Result<GameConfig> {
        let base = match &self.config {
            Some(path) => util::read_json_file("config", path)?,
            None => GameConfig::default(),
        };
        let level = self.level.unwrap_or(base.starting_level());
        let debug = self.debug || base.debug();
        GameConfig::new(level, debug).context("Invalid game settings")
    }

    pub(crate) fn seed(&self) -> ShapeSeed {
        self.seed.unwrap_or_else(rand::random)
    }
}

pub fn run() -> anyhow::Result<()> {
    let CommandArgs { game, mode } = CommandArgs::parse();
    match mode.unwrap_or(Mode::Play(play::PlayArg::default())) {
        Mode::Play(arg) => play::run(&game, &arg)?,
        Mode::Simulate(arg) => simulate::run(&game, &arg)?,
    }
    Ok(())
}
