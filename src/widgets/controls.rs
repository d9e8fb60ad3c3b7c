use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Paragraph, Widget},
};

const CONTROLS: [(&str, &str); 4] = [
    ("↑↓", "Genre"),
    ("Tab", "Panel"),
    ("e", "Export"),
    ("q", "Quit"),
];

/// Bottom bar: key hints, then an optional status message.
#[derive(Default)]
pub struct Controls {
    pub status: Option<String>,
    pub background: Color,
    pub key_color: Color,
}

impl Controls {
    pub fn new() -> Self {
        Self {
            status: None,
            background: Color::DarkGray,
            key_color: Color::Reset,
        }
    }

    pub fn with_status(mut self, status: Option<&str>) -> Self {
        self.status = status.map(str::to_string);
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_key_color(mut self, key_color: Color) -> Self {
        self.key_color = key_color;
        self
    }
}

impl Widget for &Controls {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut constraints = CONTROLS.iter().fold(vec![], |mut acc, (key, action)| {
            acc.push(Constraint::Length(key.chars().count() as u16 + 2));
            acc.push(Constraint::Length(action.chars().count() as u16 + 1));
            acc
        });
        constraints.push(Constraint::Fill(1));

        let layout = Layout::new(Direction::Horizontal, constraints).split(area);
        let bar = Style::default().bg(self.background);

        for (i, (key, action)) in CONTROLS.iter().enumerate() {
            let j = i * 2;
            Paragraph::new(*key)
                .style(Style::default().fg(self.key_color).bold())
                .centered()
                .render(layout[j], buf);
            Paragraph::new(*action).style(bar).render(layout[j + 1], buf);
        }

        let status = self.status.as_deref().unwrap_or("");
        Paragraph::new(status)
            .style(bar)
            .right_aligned()
            .render(layout[CONTROLS.len() * 2], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_hints_and_status() {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        let controls = Controls::new().with_status(Some("3 movies"));
        (&controls).render(area, &mut buf);
        let line: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect();
        assert!(line.contains("Genre"), "{line}");
        assert!(line.contains("Quit"), "{line}");
        assert!(line.trim_end().ends_with("3 movies"), "{line}");
    }
}
