use blockfall_engine::Snapshot;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::{
    command::play::input::{DEBUG_BINDINGS, GAME_OVER_BINDINGS, PLAY_BINDINGS},
    ui::{
        RenderConfig,
        widgets::{BOARD_ROWS, KeyBindingDisplay, SnapshotDisplay},
    },
};

/// What the terminal shows: the latest snapshot received from the driver.
#[derive(Debug)]
pub(crate) struct PlayScreen {
    snapshot: Option<Snapshot>,
    cell: RenderConfig,
    debug: bool,
    is_exiting: bool,
}

impl PlayScreen {
    pub(crate) fn new(cell: RenderConfig, debug: bool) -> Self {
        Self {
            snapshot: None,
            cell,
            debug,
            is_exiting: false,
        }
    }

    pub(crate) fn update(&mut self, snapshot: Snapshot) {
        self.snapshot = Some(snapshot);
    }

    pub(crate) fn is_game_over(&self) -> bool {
        self.snapshot.as_ref().is_some_and(Snapshot::is_game_over)
    }

    pub(crate) fn is_debug(&self) -> bool {
        self.debug
    }

    pub(crate) fn is_exiting(&self) -> bool {
        self.is_exiting
    }

    pub(crate) fn exit(&mut self) {
        self.is_exiting = true;
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        let Some(snapshot) = &self.snapshot else {
            let text = Text::from("Starting...")
                .style(Style::default().fg(Color::DarkGray))
                .centered();
            frame.render_widget(text, frame.area());
            return;
        };

        let bindings = if snapshot.is_game_over() {
            GAME_OVER_BINDINGS
        } else if self.debug {
            DEBUG_BINDINGS
        } else {
            PLAY_BINDINGS
        };

        #[expect(clippy::cast_possible_truncation)]
        let board_height = BOARD_ROWS as u16 * self.cell.cell_height + 2;
        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(board_height), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(
            SnapshotDisplay::new(snapshot, self.cell).debug(self.debug),
            main_area,
        );
        frame.render_widget(KeyBindingDisplay::new(bindings), help_area);
    }
}
