use polars::prelude::*;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Row, Table, Widget},
};

const MAX_COLUMN_WIDTH: usize = 32;

/// Display text for one cell. Nulls are blank and strings are shown unquoted.
pub fn cell_text(value: AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Rows of `df` as display strings, column order preserved.
pub fn frame_rows(df: &DataFrame) -> Vec<Vec<String>> {
    (0..df.height())
        .map(|row| {
            df.get_columns()
                .iter()
                .map(|column| column.get(row).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect()
}

/// First rows of the active table.
pub struct PreviewTable<'a> {
    df: &'a DataFrame,
    total_rows: usize,
    header: Color,
}

impl<'a> PreviewTable<'a> {
    pub fn new(df: &'a DataFrame, total_rows: usize) -> Self {
        Self {
            df,
            total_rows,
            header: Color::Reset,
        }
    }

    pub fn with_header_color(mut self, color: Color) -> Self {
        self.header = color;
        self
    }
}

impl Widget for PreviewTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let names: Vec<String> = self
            .df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        let rows = frame_rows(self.df);

        let widths: Vec<Constraint> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let widest = rows
                    .iter()
                    .map(|r| r[i].chars().count())
                    .max()
                    .unwrap_or(0)
                    .max(name.chars().count())
                    .min(MAX_COLUMN_WIDTH);
                Constraint::Length(widest as u16)
            })
            .collect();

        let header = Row::new(names).style(
            Style::default()
                .fg(self.header)
                .add_modifier(Modifier::BOLD),
        );
        let title = format!(
            " Preview ({} of {} rows) ",
            self.df.height(),
            self.total_rows
        );
        Table::new(rows.into_iter().map(Row::new), widths)
            .header(header)
            .column_spacing(2)
            .block(Block::default().borders(Borders::ALL).title(title))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_unquoted_and_nulls_blank() {
        let df = df!(
            "title" => &[Some("Heat"), None],
            "budget" => &[Some(60_000_000i64), None]
        )
        .unwrap();
        assert_eq!(
            frame_rows(&df),
            vec![
                vec!["Heat".to_string(), "60000000".to_string()],
                vec![String::new(), String::new()],
            ]
        );
    }
}
