use blockfall_engine::TileColor;
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::ui::widgets::style;

#[derive(Debug)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

impl BlockDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub const fn from_tile(tile: TileColor, show_dots: bool) -> Self {
        match tile {
            TileColor::Empty if show_dots => Self::new(style::EMPTY_DOT, "."),
            TileColor::Empty => Self::new(style::EMPTY, ""),
            color => Self::new(style::tile(color), ""),
        }
    }

    /// Empty cell of the hidden rows above the play area.
    pub const fn buffer() -> Self {
        Self::new(style::BUFFER_DOT, ".")
    }
}

impl Widget for BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Use a Paragraph to fill the whole area, not just the cells with the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
