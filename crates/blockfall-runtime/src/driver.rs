use blockfall_engine::{GameEngine, GameSummary, Move, Shape, ShapeSource, Snapshot, TickOutcome};
use tokio::sync::mpsc;

use crate::{event::DriverEvent, timer::ResetTimer};

/// Why [`GameDriver::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum ExitReason {
    GameOver,
    /// All move senders were dropped.
    InputClosed,
    /// The snapshot receiver was dropped.
    RendererClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverExit {
    pub reason: ExitReason,
    pub summary: GameSummary,
}

/// Runs a game on the current task.
///
/// All game state lives inside the driver. The outside world only sends
/// [`Move`]s in and receives [`Snapshot`]s out:
///
/// - one snapshot is sent when the driver starts, then one per accepted move
/// - timer ticks take priority over queued input and become [`Move::ForceDown`]
/// - the drop timer restarts whenever a new piece enters play and speeds up
///   with the level
/// - in debug mode there is no drop timer at all
#[derive(Debug)]
pub struct GameDriver<S = ShapeSource> {
    engine: GameEngine<S>,
}

impl<S> GameDriver<S>
where
    S: Iterator<Item = Shape>,
{
    #[must_use]
    pub fn new(engine: GameEngine<S>) -> Self {
        Self { engine }
    }

    /// Plays until the game ends or either channel closes.
    pub async fn run(
        mut self,
        mut moves: mpsc::Receiver<Move>,
        snapshots: mpsc::UnboundedSender<Snapshot>,
    ) -> DriverExit {
        let mut timer = if self.engine.config().debug() {
            ResetTimer::stopped(self.engine.drop_interval())
        } else {
            ResetTimer::new(self.engine.drop_interval())
        };

        if snapshots.send(self.engine.snapshot()).is_err() {
            return self.exit(ExitReason::RendererClosed);
        }

        loop {
            let event = tokio::select! {
                biased;
                () = timer.fired() => DriverEvent::Tick,
                mv = moves.recv() => mv.map_or(DriverEvent::InputClosed, DriverEvent::from),
            };

            let mv = match event {
                DriverEvent::Tick => Move::ForceDown,
                DriverEvent::Input(mv) => mv,
                DriverEvent::InputClosed => return self.exit(ExitReason::InputClosed),
            };

            // Rejected moves change nothing and produce no snapshot.
            let Ok(outcome) = self.engine.apply(mv) else {
                continue;
            };
            self.update_timer(&mut timer, outcome);

            if snapshots.send(self.engine.snapshot()).is_err() {
                return self.exit(ExitReason::RendererClosed);
            }
            if outcome.game_over {
                return self.exit(ExitReason::GameOver);
            }
        }
    }

    fn update_timer(&self, timer: &mut ResetTimer, outcome: TickOutcome) {
        if outcome.leveled_up {
            timer.set_duration(self.engine.drop_interval());
        }
        if outcome.piece_consumed {
            timer.reset();
        }
    }

    fn exit(&self, reason: ExitReason) -> DriverExit {
        DriverExit {
            reason,
            summary: self.engine.summary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{iter, time::Duration};

    use blockfall_engine::{GameConfig, Grid, Position, ShapeSeed, TileColor};
    use tokio::time::{Instant, sleep};

    use super::*;

    const SEED: u64 = 0x00c0_ffee;

    fn spawn_driver<S>(
        engine: GameEngine<S>,
    ) -> (
        mpsc::Sender<Move>,
        mpsc::UnboundedReceiver<Snapshot>,
        tokio::task::JoinHandle<DriverExit>,
    )
    where
        S: Iterator<Item = Shape> + Send + 'static,
    {
        let (move_tx, move_rx) = mpsc::channel(64);
        let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(GameDriver::new(engine).run(move_rx, snapshot_tx));
        (move_tx, snapshot_rx, handle)
    }

    fn seeded(config: GameConfig) -> GameEngine {
        GameEngine::with_seed(config, ShapeSeed::from(SEED))
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_forces_descent() {
        let start = Instant::now();
        let (_move_tx, mut snapshots, _handle) = spawn_driver(seeded(GameConfig::default()));

        let initial = snapshots.recv().await.unwrap();
        assert_eq!(initial.ticks(), 0);
        let spawn_y = initial.active_piece().unwrap().position().y;

        let ticked = snapshots.recv().await.unwrap();
        assert_eq!(ticked.ticks(), 1);
        assert_eq!(ticked.active_piece().unwrap().position().y, spawn_y - 1);
        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert!(start.elapsed() < Duration::from_millis(1010));
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_closed_stops_driver() {
        let (move_tx, mut snapshots, handle) = spawn_driver(seeded(GameConfig::default()));
        move_tx.send(Move::Left).await.unwrap();
        drop(move_tx);

        let exit = handle.await.unwrap();
        assert_eq!(exit.reason, ExitReason::InputClosed);
        assert!(!exit.summary.game_over);
        assert_eq!(exit.summary.ticks, 1);

        let mut count = 0;
        while snapshots.recv().await.is_some() {
            count += 1;
        }
        assert_eq!(count, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_renderer_closed_stops_driver() {
        let (_move_tx, snapshots, handle) = spawn_driver(seeded(GameConfig::default()));
        drop(snapshots);

        let exit = handle.await.unwrap();
        assert!(exit.reason.is_renderer_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_over_stops_driver() {
        let engine = GameEngine::with_shapes(GameConfig::default(), iter::repeat(Shape::Square));
        let (move_tx, mut snapshots, handle) = spawn_driver(engine);
        for _ in 0..20 {
            move_tx.send(Move::HardDrop).await.unwrap();
        }

        let exit = handle.await.unwrap();
        assert_eq!(exit.reason, ExitReason::GameOver);
        assert!(exit.summary.game_over);

        let mut last = None;
        while let Some(snapshot) = snapshots.recv().await {
            assert!(last.as_ref().is_none_or(|s: &Snapshot| !s.is_game_over()));
            last = Some(snapshot);
        }
        assert!(last.unwrap().is_game_over());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_move_sends_no_snapshot() {
        let (move_tx, mut snapshots, handle) = spawn_driver(seeded(GameConfig::default()));
        move_tx.send(Move::Up).await.unwrap();
        move_tx.send(Move::Right).await.unwrap();
        drop(move_tx);
        handle.await.unwrap();

        let initial = snapshots.recv().await.unwrap();
        let moved = snapshots.recv().await.unwrap();
        assert_eq!(moved.ticks(), 1);
        assert_eq!(
            moved.active_piece().unwrap().position(),
            Position::new(Position::SPAWN.x + 1, Position::SPAWN.y)
        );
        assert_eq!(initial.active_piece().unwrap().position(), Position::SPAWN);
        assert!(snapshots.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_debug_mode_has_no_timer() {
        let config = GameConfig::new(1, true).unwrap();
        let (move_tx, mut snapshots, _handle) = spawn_driver(seeded(config));
        let initial = snapshots.recv().await.unwrap();

        sleep(Duration::from_secs(60)).await;
        move_tx.send(Move::Up).await.unwrap();

        let moved = snapshots.recv().await.unwrap();
        assert_eq!(moved.ticks(), 1);
        assert_eq!(
            moved.active_piece().unwrap().position().y,
            initial.active_piece().unwrap().position().y + 1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_piece_resets_timer() {
        let start = Instant::now();
        let (move_tx, mut snapshots, _handle) = spawn_driver(seeded(GameConfig::default()));
        snapshots.recv().await.unwrap();

        sleep(Duration::from_millis(600)).await;
        move_tx.send(Move::HardDrop).await.unwrap();
        let dropped = snapshots.recv().await.unwrap();
        assert_eq!(dropped.ticks(), 1);

        let ticked = snapshots.recv().await.unwrap();
        assert_eq!(ticked.ticks(), 2);
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(1600) && elapsed < Duration::from_millis(1610),
            "{elapsed:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_level_up_shortens_drop_interval() {
        // Twelve rows full except column 5; three vertical lines clear them all.
        let mut grid = Grid::EMPTY;
        for y in 0..12 {
            for x in (0..10).filter(|&x| x != 5) {
                grid.set(TileColor::Color2, x, y).unwrap();
            }
        }
        let engine =
            GameEngine::with_grid(GameConfig::default(), grid, iter::repeat(Shape::Line));
        let start = Instant::now();
        let (move_tx, mut snapshots, _handle) = spawn_driver(engine);

        // Each drop clears four lines; the following move brings in the next piece.
        for _ in 0..3 {
            move_tx.send(Move::HardDrop).await.unwrap();
            move_tx.send(Move::Left).await.unwrap();
        }
        for _ in 0..7 {
            snapshots.recv().await.unwrap();
        }
        assert_eq!(start.elapsed(), Duration::ZERO);

        let ticked = snapshots.recv().await.unwrap();
        assert_eq!(ticked.level(), 2);
        assert_eq!(ticked.lines(), 12);
        assert_eq!(ticked.ticks(), 7);
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(950) && elapsed < Duration::from_millis(960),
            "{elapsed:?}"
        );
    }
}
