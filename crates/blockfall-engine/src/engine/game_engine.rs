use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    ActivePiece, EngineError, Grid, Shape,
    engine::{
        GameConfig, GameStats, ShapeSeed, ShapeSource,
        controller::{ControllerState, Move, PieceController},
        snapshot::Snapshot,
    },
};

/// What one accepted move changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub lines_cleared: usize,
    /// A new piece entered play.
    pub piece_consumed: bool,
    pub leveled_up: bool,
    /// This move ended the game.
    pub game_over: bool,
}

/// Final numbers of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub score: u64,
    pub level: u8,
    pub lines: usize,
    pub ticks: u64,
    pub line_cleared_counter: [usize; 5],
    pub game_over: bool,
}

/// A complete game: grid, falling piece, score keeping and the shape supply.
///
/// The engine is driven one [`Move`] at a time. It has no notion of time;
/// automatic descent is a [`Move::ForceDown`] sent by whoever owns the clock.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameConfig, GameEngine, Move, ShapeSeed};
///
/// let mut engine = GameEngine::with_seed(GameConfig::default(), ShapeSeed::from(1_u64));
/// let outcome = engine.apply(Move::HardDrop).unwrap();
/// assert!(outcome.piece_consumed);
/// assert_eq!(engine.snapshot().ticks(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameEngine<S = ShapeSource> {
    config: GameConfig,
    controller: PieceController,
    stats: GameStats,
    shapes: S,
    next_shape: Shape,
}

impl GameEngine {
    /// Creates a game with randomly seeded shapes.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_shapes(config, ShapeSource::new())
    }

    #[must_use]
    pub fn with_seed(config: GameConfig, seed: ShapeSeed) -> Self {
        Self::with_shapes(config, ShapeSource::with_seed(seed))
    }
}

impl<S> GameEngine<S>
where
    S: Iterator<Item = Shape>,
{
    /// Creates a game that draws its pieces from `shapes`.
    ///
    /// Once a finite source runs dry its last shape repeats; an empty source
    /// yields squares.
    #[must_use]
    pub fn with_shapes(config: GameConfig, shapes: S) -> Self {
        Self::with_grid(config, Grid::EMPTY, shapes)
    }

    /// Creates a game that starts on a prepared `grid`.
    ///
    /// Shapes are drawn as in [`with_shapes`](Self::with_shapes).
    #[must_use]
    pub fn with_grid(config: GameConfig, grid: Grid, mut shapes: S) -> Self {
        let first = shapes.next().unwrap_or(Shape::Square);
        let next_shape = shapes.next().unwrap_or(first);
        Self {
            config,
            controller: PieceController::with_grid(grid, first),
            stats: GameStats::new(config.starting_level()),
            shapes,
            next_shape,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        self.controller.grid()
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<ActivePiece> {
        self.controller.active_piece()
    }

    #[must_use]
    pub fn controller_state(&self) -> ControllerState {
        self.controller.state()
    }

    #[must_use]
    pub fn next_shape(&self) -> Shape {
        self.next_shape
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.controller.is_game_over()
    }

    /// Time between automatic descents at the current level.
    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        self.stats.drop_interval()
    }

    /// Applies one move and updates the score.
    ///
    /// # Errors
    ///
    /// - [`EngineError::GameOver`] once the game has ended
    /// - [`EngineError::MoveRejected`] for [`Move::Up`] outside debug mode
    pub fn apply(&mut self, mv: Move) -> Result<TickOutcome, EngineError> {
        if self.is_game_over() {
            return Err(EngineError::GameOver);
        }
        if mv == Move::Up && !self.config.debug() {
            return Err(EngineError::MoveRejected { mv });
        }

        self.stats.record_tick();
        let advance = self.controller.advance(mv, self.next_shape);

        let mut outcome = TickOutcome {
            lines_cleared: advance.lines_cleared,
            piece_consumed: advance.piece_consumed,
            ..TickOutcome::default()
        };
        if advance.lines_cleared > 0 {
            outcome.leveled_up = self.stats.record_line_clear(advance.lines_cleared);
        }
        if advance.piece_consumed {
            self.stats.record_piece_consumed();
            self.next_shape = self.shapes.next().unwrap_or(self.next_shape);
        }
        if self.controller.is_game_over() {
            self.stats.record_game_over();
            outcome.game_over = true;
        }
        Ok(outcome)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let active_piece = self.controller.active_piece();
        Snapshot {
            score: self.stats.score(),
            level: self.stats.level(),
            lines: self.stats.total_cleared_lines(),
            lines_to_next_level: self.stats.lines_to_next_level(),
            ticks: self.stats.ticks(),
            grid: self.controller.grid().clone(),
            current_shape: active_piece.map(|piece| piece.shape()),
            next_shape: self.next_shape,
            active_piece,
            game_over: self.is_game_over(),
        }
    }

    #[must_use]
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.stats.score(),
            level: self.stats.level(),
            lines: self.stats.total_cleared_lines(),
            ticks: self.stats.ticks(),
            line_cleared_counter: *self.stats.line_cleared_counter(),
            game_over: self.is_game_over(),
        }
    }
}
