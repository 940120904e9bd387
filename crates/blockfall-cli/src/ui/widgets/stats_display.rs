use std::iter;

use blockfall_engine::GameEngine;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

pub struct StatsDisplay<'a> {
    engine: &'a GameEngine,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(engine: &'a GameEngine) -> Self {
        Self {
            engine,
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
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        super::to_u16(ROWS.len()) + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&GameEngine) -> String),
    LabelValue(&'static str, &'static dyn Fn(&GameEngine) -> String),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|engine| engine.score().to_string()),
    Row::Empty,
    Row::LabelValue("ROWS:", &|engine| {
        engine.stats().total_cleared_rows().to_string()
    }),
    Row::LabelValue("BLOCKS:", &|engine| {
        engine.stats().completed_blocks().to_string()
    }),
    Row::Empty,
    Row::LabelValue("SINGLES:", &|engine| {
        engine.stats().row_clear_counter()[1].to_string()
    }),
    Row::LabelValue("DOUBLES:", &|engine| {
        engine.stats().row_clear_counter()[2].to_string()
    }),
    Row::LabelValue("TRIPLES:", &|engine| {
        engine.stats().row_clear_counter()[3].to_string()
    }),
    Row::LabelValue("FOURS:", &|engine| {
        engine.stats().row_clear_counter()[4].to_string()
    }),
    Row::Empty,
    Row::LabelValue("DROP:", &|engine| {
        format!("{} ms", engine.drop_interval().as_millis())
    }),
];

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas.iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.engine), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.engine), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
