//! Genre list on the left: the dashboard's single filter control.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget},
};

use crate::filter::{GenreSelection, ALL_GENRES_LABEL};

pub const SIDEBAR_WIDTH: u16 = 26;

/// Selection for list position `index`: 0 is "All genres", then the genres in order.
pub fn selection_at(genres: &[String], index: usize) -> GenreSelection {
    match index.checked_sub(1).and_then(|i| genres.get(i)) {
        Some(name) => GenreSelection::Genre(name.clone()),
        None => GenreSelection::All,
    }
}

/// List position of `selection`, if it is one of the entries.
pub fn index_of(genres: &[String], selection: &GenreSelection) -> Option<usize> {
    match selection {
        GenreSelection::All => Some(0),
        GenreSelection::Genre(name) => genres.iter().position(|g| g == name).map(|i| i + 1),
    }
}

pub struct GenreSidebar<'a> {
    genres: &'a [String],
    border: Color,
    highlight: Color,
}

impl<'a> GenreSidebar<'a> {
    pub fn new(genres: &'a [String]) -> Self {
        Self {
            genres,
            border: Color::Reset,
            highlight: Color::Cyan,
        }
    }

    pub fn with_border(mut self, border: Color) -> Self {
        self.border = border;
        self
    }

    pub fn with_highlight(mut self, highlight: Color) -> Self {
        self.highlight = highlight;
        self
    }
}

impl StatefulWidget for GenreSidebar<'_> {
    type State = ListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut ListState) {
        let items: Vec<ListItem> = std::iter::once(ALL_GENRES_LABEL)
            .chain(self.genres.iter().map(String::as_str))
            .map(ListItem::new)
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.border))
                    .title(" Genre "),
            )
            .highlight_style(
                Style::default()
                    .fg(self.highlight)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        StatefulWidget::render(list, area, buf, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genres() -> Vec<String> {
        vec!["Action".to_string(), "Comedy".to_string()]
    }

    #[test]
    fn positions_map_to_selections() {
        let g = genres();
        assert_eq!(selection_at(&g, 0), GenreSelection::All);
        assert_eq!(selection_at(&g, 2), GenreSelection::Genre("Comedy".into()));
        assert_eq!(selection_at(&g, 9), GenreSelection::All);
        assert_eq!(index_of(&g, &GenreSelection::Genre("Action".into())), Some(1));
        assert_eq!(index_of(&g, &GenreSelection::Genre("Drama".into())), None);
        assert_eq!(index_of(&g, &GenreSelection::All), Some(0));
    }
}
