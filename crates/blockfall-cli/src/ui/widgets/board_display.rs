use std::iter;

use blockfall_engine::{Board, Cell, FallingBlock};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::CellDisplay;

/// The board grid with the falling block drawn over it.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    falling_block: Option<&'a FallingBlock>,
    fading_rows: &'a [usize],
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            falling_block: None,
            fading_rows: &[],
            block: None,
        }
    }

    pub fn falling_block(self, falling_block: Option<&'a FallingBlock>) -> Self {
        Self {
            falling_block,
            ..self
        }
    }

    pub fn fading_rows(self, fading_rows: &'a [usize]) -> Self {
        Self {
            fading_rows,
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
        super::to_u16(self.board.col_count()) * CellDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        super::to_u16(self.board.row_count()) * CellDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }

    /// The board cells with the falling block written in.
    fn composed_rows(&self) -> Vec<Vec<Cell>> {
        let mut rows = self.board.to_rows();
        if let Some(falling) = self.falling_block {
            for (x, y) in falling.occupied_positions() {
                let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                    continue;
                };
                if let Some(cell) = rows.get_mut(y).and_then(|row| row.get_mut(x)) {
                    *cell = Some(falling.color.clone());
                }
            }
        }
        rows
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

        let col_constraints = (0..self.board.col_count())
            .map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints = (0..self.board.row_count())
            .map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (y, (grid_row, row)) in iter::zip(grid_cells, self.composed_rows()).enumerate() {
            let fading = self.fading_rows.contains(&y);
            for (grid_cell, cell) in iter::zip(grid_row, row) {
                let display = match cell {
                    _ if fading => CellDisplay::fading(),
                    Some(color) => CellDisplay::filled(&color),
                    None => CellDisplay::empty(true),
                };
                display.render(grid_cell, buf);
            }
        }
    }
}
