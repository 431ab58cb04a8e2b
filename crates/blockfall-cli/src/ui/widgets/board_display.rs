use std::iter;

use blockfall_engine::Grid;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::{RenderConfig, widgets::BlockDisplay};

/// Rows drawn by [`BoardDisplay`]: the visible play area plus the buffer rows
/// new pieces spawn into.
pub const BOARD_ROWS: usize = Grid::VISIBLE_HEIGHT + 4;

#[expect(clippy::cast_possible_truncation)]
const COLUMNS: u16 = Grid::WIDTH as u16;
#[expect(clippy::cast_possible_truncation)]
const ROWS: u16 = BOARD_ROWS as u16;

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    grid: &'a Grid,
    cell: RenderConfig,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(grid: &'a Grid, cell: RenderConfig) -> Self {
        Self {
            grid,
            cell,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        COLUMNS * self.cell.cell_width + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        ROWS * self.cell.cell_height + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints = (0..COLUMNS).map(|_| Constraint::Length(self.cell.cell_width));
        let row_constraints = (0..ROWS).map(|_| Constraint::Length(self.cell.cell_height));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_rows = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        // Screen rows run top down, grid rows bottom up.
        for (y, grid_row) in iter::zip((0..BOARD_ROWS).rev(), grid_rows) {
            let visible = y < Grid::VISIBLE_HEIGHT;
            for (grid_cell, tile) in iter::zip(grid_row, self.grid.row(y).cells()) {
                let block = if visible || !tile.is_empty() {
                    BlockDisplay::from_tile(*tile, true)
                } else {
                    BlockDisplay::buffer()
                };
                block.render(grid_cell, buf);
            }
        }
    }
}
