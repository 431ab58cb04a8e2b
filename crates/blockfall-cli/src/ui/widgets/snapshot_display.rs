use blockfall_engine::Snapshot;
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::{
    RenderConfig,
    widgets::{BoardDisplay, PieceDisplay, StatsDisplay, color, style},
};

/// Full game screen for one snapshot: stats, board and next-shape preview.
#[derive(Debug)]
pub struct SnapshotDisplay<'a> {
    snapshot: &'a Snapshot,
    cell: RenderConfig,
    debug: bool,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SnapshotDisplay<'a> {
    pub fn new(snapshot: &'a Snapshot, cell: RenderConfig) -> Self {
        Self {
            snapshot,
            cell,
            debug: false,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    pub fn debug(self, debug: bool) -> Self {
        Self { debug, ..self }
    }
}

impl Widget for SnapshotDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SnapshotDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let style = style::DEFAULT;
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = if self.snapshot.is_game_over() {
            color::RED
        } else if self.debug {
            color::MAGENTA
        } else {
            color::WHITE
        };

        let game_board = BoardDisplay::new(self.snapshot.grid(), self.cell)
            .block(Block::bordered().border_style(border_style).style(style));
        let next_panel = PieceDisplay::new(self.cell)
            .shape(self.snapshot.next_shape())
            .block(
                Block::bordered()
                    .title(Line::from("NEXT").centered())
                    .padding(block_padding)
                    .border_style(border_style)
                    .style(style),
            );
        let stats = StatsDisplay::new(self.snapshot).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style),
        );

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(stats.width()),
            Constraint::Length(game_board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] = Layout::vertical([Constraint::Length(stats.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let game_board_width = game_board.width();
        stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);

        if self.snapshot.is_game_over() {
            let style = Style::new().fg(color::WHITE).bg(color::RED);
            let block = Block::new().style(style);
            let text = Text::styled("GAME OVER!!", style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
