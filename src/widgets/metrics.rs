use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::dashboard::Metrics;
use crate::report::{format_currency, format_rating};

/// Row of headline numbers above the chart panel.
pub struct MetricTiles<'a> {
    metrics: &'a Metrics,
    value_color: Color,
    border: Color,
}

impl<'a> MetricTiles<'a> {
    pub fn new(metrics: &'a Metrics) -> Self {
        Self {
            metrics,
            value_color: Color::Reset,
            border: Color::Reset,
        }
    }

    pub fn with_value_color(mut self, color: Color) -> Self {
        self.value_color = color;
        self
    }

    pub fn with_border(mut self, color: Color) -> Self {
        self.border = color;
        self
    }

    fn tiles(&self) -> [(&'static str, String); 4] {
        [
            ("Movies", self.metrics.movies.to_string()),
            ("Total budget", format_currency(self.metrics.budget_sum)),
            ("Mean rating", format_rating(self.metrics.mean_rating)),
            ("Genre rows", self.metrics.rows.to_string()),
        ]
    }
}

impl Widget for MetricTiles<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let tiles = self.tiles();
        let layout = Layout::new(
            Direction::Horizontal,
            tiles.iter().map(|_| Constraint::Fill(1)),
        )
        .split(area);
        for ((label, value), cell) in tiles.into_iter().zip(layout.iter()) {
            Paragraph::new(value)
                .style(
                    Style::default()
                        .fg(self.value_color)
                        .add_modifier(Modifier::BOLD),
                )
                .centered()
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(self.border))
                        .title(format!(" {} ", label)),
                )
                .render(*cell, buf);
        }
    }
}
