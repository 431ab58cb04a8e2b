use serde::{Deserialize, Serialize};

use crate::core::{
    GAME_OVER_ROW,
    active_piece::{ActivePiece, Direction},
    grid::{Grid, TileColor},
    piece::{RotationDirection, Shape},
};

/// A single command for the falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
    /// Drop as far as possible and lock.
    HardDrop,
    RotateLeft,
    RotateRight,
    /// Move down one row, locking the piece if it cannot.
    ForceDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant)]
pub enum ControllerState {
    /// A piece is falling.
    Active,
    /// A piece was locked and cleared lines; the next piece has not spawned yet.
    Cleared,
    /// Terminal.
    GameOver,
}

/// What a single [`PieceController::advance`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Advance {
    pub lines_cleared: usize,
    /// The `next_shape` passed in was spawned.
    pub piece_consumed: bool,
}

/// Moves the falling piece over the grid and applies the locking rules.
///
/// The falling piece is kept painted on the grid, so the grid always shows
/// exactly what a renderer should draw.
///
/// # Locking
///
/// When a piece locks, full lines are collapsed. If any were cleared the
/// controller enters [`ControllerState::Cleared`] and the next piece spawns on
/// the following `advance`. Otherwise a piece resting in the game-over row ends
/// the game; if not, the next piece spawns right away and the game also ends
/// when it overlaps locked tiles.
#[derive(Debug, Clone)]
pub struct PieceController {
    grid: Grid,
    active: Option<ActivePiece>,
    state: ControllerState,
}

impl PieceController {
    /// Creates a controller with an empty grid and `first` in play.
    #[must_use]
    pub fn new(first: Shape) -> Self {
        Self::with_grid(Grid::EMPTY, first)
    }

    /// Creates a controller over a prepared grid and spawns `first`.
    #[must_use]
    pub fn with_grid(grid: Grid, first: Shape) -> Self {
        let mut this = Self {
            grid,
            active: None,
            state: ControllerState::Active,
        };
        this.spawn(first);
        this
    }

    /// Empties the grid and starts over with `first`.
    pub fn reset(&mut self, first: Shape) {
        self.grid.clear();
        self.active = None;
        self.state = ControllerState::Active;
        self.spawn(first);
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<ActivePiece> {
        self.active
    }

    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Applies `mv`, using `next_shape` if a new piece has to spawn.
    ///
    /// In the `Cleared` state the move is ignored and `next_shape` spawns. In the
    /// `GameOver` state nothing happens.
    pub fn advance(&mut self, mv: Move, next_shape: Shape) -> Advance {
        match self.state {
            ControllerState::GameOver => Advance::default(),
            ControllerState::Cleared => self.spawn(next_shape),
            ControllerState::Active => match mv {
                Move::Up => self.directional(Direction::Up),
                Move::Down => self.directional(Direction::Down),
                Move::Left => self.directional(Direction::Left),
                Move::Right => self.directional(Direction::Right),
                Move::RotateLeft => {
                    self.rotate(RotationDirection::Left);
                    Advance::default()
                }
                Move::RotateRight => {
                    self.rotate(RotationDirection::Right);
                    Advance::default()
                }
                Move::HardDrop => self.hard_drop(next_shape),
                Move::ForceDown => self.force_down(next_shape),
            },
        }
    }

    fn directional(&mut self, direction: Direction) -> Advance {
        self.try_move(direction);
        Advance::default()
    }

    /// Moves the falling piece one cell if nothing is in the way.
    ///
    /// Returns `true` if it moved.
    pub fn try_move(&mut self, direction: Direction) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        if !piece.can_move(direction, &self.grid) {
            return false;
        }
        self.erase(piece);
        self.place(piece.moved(direction));
        true
    }

    /// Rotates the falling piece a quarter turn, kicking it back inside the
    /// grid if needed.
    ///
    /// When the kicked piece overlaps locked tiles the rotation is undone and
    /// the piece stays where it was. Returns `true` if the rotation stuck.
    pub fn rotate(&mut self, direction: RotationDirection) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        self.erase(piece);
        let rotated = piece.rotated(direction).wall_kicked();
        if rotated.fits(&self.grid) {
            self.place(rotated);
            return true;
        }
        let restored = rotated.rotated(direction.inverse());
        self.place(ActivePiece::new(restored.piece(), piece.position()));
        false
    }

    /// Drops the falling piece as far as it goes, then locks it.
    pub fn hard_drop(&mut self, next_shape: Shape) -> Advance {
        while self.try_move(Direction::Down) {}
        self.lock(next_shape)
    }

    /// Moves the falling piece down one row, locking it if it is resting.
    pub fn force_down(&mut self, next_shape: Shape) -> Advance {
        if self.try_move(Direction::Down) {
            return Advance::default();
        }
        self.lock(next_shape)
    }

    /// Makes the falling piece permanent where it stands.
    ///
    /// Does nothing when no piece is falling.
    pub fn lock(&mut self, next_shape: Shape) -> Advance {
        let Some(piece) = self.active.take() else {
            return Advance::default();
        };

        let lines_cleared = self.grid.collapse();
        if lines_cleared > 0 {
            self.state = ControllerState::Cleared;
            return Advance {
                lines_cleared,
                piece_consumed: false,
            };
        }

        if piece.cells().any(|cell| cell.y == GAME_OVER_ROW) {
            self.state = ControllerState::GameOver;
            return Advance::default();
        }

        self.spawn(next_shape)
    }

    fn spawn(&mut self, shape: Shape) -> Advance {
        let piece = ActivePiece::spawn(shape);
        if !piece.fits(&self.grid) {
            self.active = None;
            self.state = ControllerState::GameOver;
            return Advance::default();
        }
        self.place(piece);
        self.state = ControllerState::Active;
        Advance {
            lines_cleared: 0,
            piece_consumed: true,
        }
    }

    fn place(&mut self, piece: ActivePiece) {
        let color = piece.shape().color();
        for cell in piece.cells() {
            self.grid.paint(cell, color);
        }
        self.active = Some(piece);
    }

    fn erase(&mut self, piece: ActivePiece) {
        for cell in piece.cells() {
            self.grid.paint(cell, TileColor::Empty);
        }
    }
}
