use blockfall_engine::{Rotation, Shape, TileColor};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::{RenderConfig, widgets::BlockDisplay};

/// Preview of a shape in its spawn orientation, trimmed to its occupied cells.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    shape: Option<Shape>,
    cell: RenderConfig,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new(cell: RenderConfig) -> Self {
        Self {
            shape: None,
            cell,
            block: None,
        }
    }

    pub fn shape(self, shape: Shape) -> Self {
        Self {
            shape: Some(shape),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * self.cell.cell_width + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        4 * self.cell.cell_height + super::block_vertical_margin(self.block.as_ref())
    }
}

/// Bounding box of the occupied cells as `(left, top, width, height)`.
fn occupied_bounds(shape: Shape) -> (usize, usize, usize, usize) {
    let mask = shape.mask(Rotation::SPAWN);
    let occupied = |row, col| mask.is_set(row, col);
    let rows: Vec<_> = (0..mask.size())
        .filter(|&row| (0..mask.size()).any(|col| occupied(row, col)))
        .collect();
    let cols: Vec<_> = (0..mask.size())
        .filter(|&col| (0..mask.size()).any(|row| occupied(row, col)))
        .collect();
    match (rows.first(), rows.last(), cols.first(), cols.last()) {
        (Some(&top), Some(&bottom), Some(&left), Some(&right)) => {
            (left, top, right - left + 1, bottom - top + 1)
        }
        _ => (0, 0, 0, 0),
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(shape) = self.shape else {
            return;
        };
        let mask = shape.mask(Rotation::SPAWN);
        let (left, top, width, height) = occupied_bounds(shape);
        let (Ok(cols), Ok(rows)) = (u16::try_from(width), u16::try_from(height)) else {
            return;
        };

        let piece_area = area.centered(
            Constraint::Length(cols * self.cell.cell_width),
            Constraint::Length(rows * self.cell.cell_height),
        );
        let col_constraints = (0..cols).map(|_| Constraint::Length(self.cell.cell_width));
        let row_constraints = (0..rows).map(|_| Constraint::Length(self.cell.cell_height));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let occupied_block = BlockDisplay::from_tile(shape.color(), false);
        let empty_block = BlockDisplay::from_tile(TileColor::Empty, false);
        for (y, grid_row) in grid_rows.enumerate() {
            for (x, grid_cell) in grid_row.into_iter().enumerate() {
                if mask.is_set(top + y, left + x) {
                    Widget::render(&occupied_block, grid_cell, buf);
                } else {
                    Widget::render(&empty_block, grid_cell, buf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupied_bounds() {
        assert_eq!(occupied_bounds(Shape::Square), (0, 0, 2, 2));
        assert_eq!(occupied_bounds(Shape::Line), (1, 0, 1, 4));
        assert_eq!(occupied_bounds(Shape::T), (0, 1, 3, 2));
        assert_eq!(occupied_bounds(Shape::J), (0, 0, 2, 3));
    }
}
