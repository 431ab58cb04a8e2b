use std::time::Duration;

use anyhow::Context as _;
use blockfall_engine::{GameEngine, Move, Snapshot};
use blockfall_runtime::{DriverExit, ExitReason, GameDriver};
use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use crate::{command::GameArgs, ui::RenderConfig};

use self::{input::Action, screen::PlayScreen};

mod input;
mod screen;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const INPUT_QUEUE_LEN: usize = 32;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    render: RenderArgs,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RenderArgs {
    /// Terminal columns per grid cell
    #[clap(long, default_value_t = 2, value_parser = clap::value_parser!(u16).range(1..=4))]
    cell_width: u16,
    /// Terminal rows per grid cell
    #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=2))]
    cell_height: u16,
}

impl Default for RenderArgs {
    fn default() -> Self {
        let RenderConfig {
            cell_width,
            cell_height,
        } = RenderConfig::default();
        Self {
            cell_width,
            cell_height,
        }
    }
}

impl RenderArgs {
    fn render_config(&self) -> RenderConfig {
        RenderConfig {
            cell_width: self.cell_width,
            cell_height: self.cell_height,
        }
    }
}

pub(crate) fn run(game: &GameArgs, arg: &PlayArg) -> anyhow::Result<()> {
    let config = game.game_config()?;
    let seed = game.seed();
    if config.debug() {
        eprintln!("Debug mode: automatic descent is off, ↑ moves the piece up");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .context("Failed to start the async runtime")?;

    let (move_tx, move_rx) = mpsc::channel(INPUT_QUEUE_LEN);
    let (snapshot_tx, mut snapshot_rx) = mpsc::unbounded_channel();
    let driver = GameDriver::new(GameEngine::with_seed(config, seed));
    let handle = runtime.spawn(driver.run(move_rx, snapshot_tx));

    let mut screen = PlayScreen::new(arg.render.render_config(), config.debug());
    ratatui::run(|terminal| event_loop(terminal, &mut screen, &move_tx, &mut snapshot_rx))?;

    // A driver that is still running stops once its input closes.
    drop(move_tx);
    let DriverExit { reason, summary } = runtime
        .block_on(handle)
        .context("Game driver task failed")?;

    let headline = match reason {
        ExitReason::GameOver => "Game over!",
        ExitReason::InputClosed | ExitReason::RendererClosed => "Game quit.",
    };
    println!(
        "{headline} Score: {}  Level: {}  Lines: {}  Ticks: {}",
        summary.score, summary.level, summary.lines, summary.ticks
    );
    println!("Replay this sequence with --seed {seed}");
    Ok(())
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    screen: &mut PlayScreen,
    moves: &mpsc::Sender<Move>,
    snapshots: &mut mpsc::UnboundedReceiver<Snapshot>,
) -> anyhow::Result<()> {
    let mut needs_redraw = true;
    while !screen.is_exiting() {
        while let Ok(snapshot) = snapshots.try_recv() {
            screen.update(snapshot);
            needs_redraw = true;
        }
        if needs_redraw {
            terminal.draw(|frame| screen.draw(frame))?;
            needs_redraw = false;
        }

        if !event::poll(FRAME_INTERVAL)? {
            continue;
        }
        let event = event::read()?;
        if matches!(event, Event::Resize(..)) {
            needs_redraw = true;
        }
        let Some(key) = event.as_key_press_event() else {
            continue;
        };
        match input::action_for_key(key, screen.is_debug()) {
            Some(Action::Quit) => screen.exit(),
            Some(Action::Move(_)) if screen.is_game_over() => {}
            // A full queue drops the key press rather than stall the screen.
            Some(Action::Move(mv)) => _ = moves.try_send(mv),
            None => {}
        }
    }
    Ok(())
}
