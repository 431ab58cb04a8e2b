use blockfall_engine::Move;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ui::widgets::KeyBinding;

/// What a key press asks the play screen to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Move(Move),
    Quit,
}

pub(crate) fn action_for_key(key: KeyEvent, debug: bool) -> Option<Action> {
    let mv = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(Action::Quit);
        }
        KeyCode::Char('q') | KeyCode::Esc => return Some(Action::Quit),
        KeyCode::Left => Move::Left,
        KeyCode::Right => Move::Right,
        KeyCode::Down => Move::Down,
        KeyCode::Up if debug => Move::Up,
        KeyCode::Up | KeyCode::Char('a') => Move::RotateLeft,
        KeyCode::Char('d') => Move::RotateRight,
        KeyCode::Char(' ') => Move::HardDrop,
        KeyCode::Char('s') if debug => Move::ForceDown,
        _ => return None,
    };
    Some(Action::Move(mv))
}

pub(crate) const PLAY_BINDINGS: &[KeyBinding] = &[
    (&["←", "→", "↓"], "Move"),
    (&["↑", "a"], "Rotate Left"),
    (&["d"], "Rotate Right"),
    (&["Space"], "Drop"),
    (&["q"], "Quit"),
];

pub(crate) const DEBUG_BINDINGS: &[KeyBinding] = &[
    (&["←", "→", "↑", "↓"], "Move"),
    (&["a"], "Rotate Left"),
    (&["d"], "Rotate Right"),
    (&["Space"], "Drop"),
    (&["s"], "Tick"),
    (&["q"], "Quit"),
];

pub(crate) const GAME_OVER_BINDINGS: &[KeyBinding] = &[(&["q"], "Quit")];
