use std::iter;

use blockfall_engine::Block;
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::{CellDisplay, ShapeDisplay};

/// Preview of the upcoming queue, next block on top.
#[derive(Debug)]
pub struct UpcomingDisplay<'a> {
    blocks: Vec<&'a Block>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> UpcomingDisplay<'a> {
    pub fn new<I>(blocks: I) -> Self
    where
        I: IntoIterator<Item = &'a Block>,
    {
        Self {
            blocks: blocks.into_iter().collect(),
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    /// Every preview slot gets room for the widest and tallest queued shape.
    fn slot_size(&self) -> (u16, u16) {
        let width = self.blocks.iter().map(|b| b.shape.width()).max();
        let height = self.blocks.iter().map(|b| b.shape.height()).max();
        (
            super::to_u16(width.unwrap_or(0).max(4)),
            super::to_u16(height.unwrap_or(0).max(2)),
        )
    }

    pub fn width(&self) -> u16 {
        self.slot_size().0 * CellDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        let num_blocks = super::to_u16(self.blocks.len());
        let padding = num_blocks.saturating_sub(1);
        self.slot_size().1 * CellDisplay::height() * num_blocks
            + padding
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for UpcomingDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &UpcomingDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        let slot_height = self.slot_size().1 * CellDisplay::height();
        let layout = Layout::vertical(
            (0..self.blocks.len()).map(|_| Constraint::Length(slot_height)),
        )
        .flex(Flex::SpaceBetween);
        let cells = area.layout_vec(&layout);

        for (cell, queued) in iter::zip(cells, &self.blocks) {
            ShapeDisplay::new().shape_block(queued).render(cell, buf);
        }
    }
}
