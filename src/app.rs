//! Interactive dashboard state and key handling.

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, ListState, Paragraph, StatefulWidget, Tabs, Widget, Wrap},
};
use std::path::PathBuf;

use crate::chart_export::export_dashboard_charts;
use crate::config::{AppConfig, Theme};
use crate::dashboard::{insights, Catalog, DashboardOptions, DashboardView};
use crate::error_display::user_message;
use crate::filter::GenreSelection;
use crate::widgets::chart::{
    render_budget_revenue, render_categories, render_ratings, render_yearly, ChartColors,
};
use crate::widgets::controls::Controls;
use crate::widgets::metrics::MetricTiles;
use crate::widgets::preview::PreviewTable;
use crate::widgets::sidebar::{index_of, selection_at, GenreSidebar, SIDEBAR_WIDTH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Select(GenreSelection),
    Export,
    Exit,
    Crash(String),
    Resize(u16, u16), // resized (width, height)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    #[default]
    Years,
    Ratings,
    BudgetRevenue,
    Languages,
    Companies,
    Preview,
}

impl Panel {
    pub const ALL: [Panel; 6] = [
        Panel::Years,
        Panel::Ratings,
        Panel::BudgetRevenue,
        Panel::Languages,
        Panel::Companies,
        Panel::Preview,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Panel::Years => "Years",
            Panel::Ratings => "Ratings",
            Panel::BudgetRevenue => "Budget vs Revenue",
            Panel::Languages => "Languages",
            Panel::Companies => "Companies",
            Panel::Preview => "Preview",
        }
    }

    fn index(self) -> usize {
        Panel::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Panel::ALL[(self.index() + 1) % Panel::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Panel::ALL[(self.index() + Panel::ALL.len() - 1) % Panel::ALL.len()]
    }
}

/// Where and how big the `e` key writes charts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    pub dir: PathBuf,
    pub size: (u32, u32),
}

impl ExportSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.chart.export_dir),
            size: (config.chart.export_width, config.chart.export_height),
        }
    }
}

pub struct App {
    catalog: Catalog,
    options: DashboardOptions,
    theme: Theme,
    export: ExportSettings,
    sidebar: ListState,
    view: DashboardView,
    panel: Panel,
    status: Option<String>,
}

impl App {
    /// Build the dashboard with `selection` active. A genre the dataset does not have falls
    /// back to all genres.
    pub fn new(
        catalog: Catalog,
        options: DashboardOptions,
        theme: Theme,
        export: ExportSettings,
        selection: &GenreSelection,
    ) -> Result<Self> {
        let (index, selection) = match index_of(catalog.genres(), selection) {
            Some(index) => (index, selection.clone()),
            None => (0, GenreSelection::All),
        };
        let view = catalog.view(&selection, &options)?;
        Ok(Self {
            catalog,
            options,
            theme,
            export,
            sidebar: ListState::default().with_selected(Some(index)),
            view,
            panel: Panel::default(),
            status: None,
        })
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn selection(&self) -> &GenreSelection {
        &self.view.selection
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn entry_count(&self) -> usize {
        self.catalog.genres().len() + 1
    }

    fn select_index(&mut self, index: usize) -> Option<AppEvent> {
        let index = index.min(self.entry_count() - 1);
        if self.sidebar.selected() == Some(index) {
            return None;
        }
        self.sidebar.select(Some(index));
        Some(AppEvent::Select(selection_at(self.catalog.genres(), index)))
    }

    fn key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        if event.kind != KeyEventKind::Press {
            return None;
        }
        let current = self.sidebar.selected().unwrap_or(0);
        match event.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Exit),
            KeyCode::Down | KeyCode::Char('j') => self.select_index(current + 1),
            KeyCode::Up | KeyCode::Char('k') => self.select_index(current.saturating_sub(1)),
            KeyCode::Home => self.select_index(0),
            KeyCode::End => self.select_index(self.entry_count() - 1),
            KeyCode::Tab | KeyCode::Right => {
                self.panel = self.panel.next();
                None
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.panel = self.panel.previous();
                None
            }
            KeyCode::Char('e') => Some(AppEvent::Export),
            _ => None,
        }
    }

    fn recompute(&mut self, selection: &GenreSelection) -> Option<AppEvent> {
        match self.catalog.view(selection, &self.options) {
            Ok(view) => {
                self.view = view;
                self.status = None;
                None
            }
            Err(e) => Some(AppEvent::Crash(user_message(&e, None))),
        }
    }

    fn export_charts(&mut self) {
        let result = export_dashboard_charts(&self.view, &self.export.dir, self.export.size);
        self.status = Some(match result {
            Ok(paths) => format!(
                "Wrote {} charts to {}",
                paths.len(),
                self.export.dir.display()
            ),
            Err(e) => format!("Export failed: {}", user_message(&e, None)),
        });
    }

    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        match event {
            AppEvent::Key(key) => self.key(key),
            AppEvent::Select(selection) => self.recompute(selection),
            AppEvent::Export => {
                self.export_charts();
                None
            }
            _ => None,
        }
    }

    fn chart_colors(&self) -> ChartColors {
        ChartColors {
            bar: self.theme.get("bar"),
            peak: self.theme.get("peak_marker"),
            text: self.theme.get("text_primary"),
            dimmed: self.theme.get("dimmed"),
        }
    }

    fn render_panel(&self, area: Rect, buf: &mut Buffer) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Fill(1)])
            .split(area);

        let titles: Vec<Line> = Panel::ALL.iter().map(|p| Line::from(p.title())).collect();
        Tabs::new(titles)
            .select(self.panel.index())
            .style(Style::default().fg(self.theme.get("dimmed")))
            .highlight_style(Style::default().fg(self.theme.get("accent")))
            .render(layout[0], buf);

        let colors = self.chart_colors();
        let view = &self.view;
        match self.panel {
            Panel::Years => render_yearly(layout[1], buf, &view.yearly, view.peak_year, &colors),
            Panel::Ratings => render_ratings(layout[1], buf, &view.ratings, &colors),
            Panel::BudgetRevenue => {
                render_budget_revenue(layout[1], buf, &view.budget_revenue, &colors)
            }
            Panel::Languages => render_categories(
                layout[1],
                buf,
                "Top original languages",
                &view.languages,
                &colors,
            ),
            Panel::Companies => render_categories(
                layout[1],
                buf,
                "Top production companies",
                &view.companies,
                &colors,
            ),
            Panel::Preview => match view.preview() {
                Ok(preview) => PreviewTable::new(&preview, view.metrics.rows)
                    .with_header_color(self.theme.get("accent"))
                    .render(layout[1], buf),
                Err(e) => Paragraph::new(user_message(&e, None))
                    .block(Block::default().borders(Borders::ALL).title(" Preview "))
                    .render(layout[1], buf),
            },
        }
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Fill(1), Constraint::Length(1)])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Fill(1)])
            .split(outer[0]);

        GenreSidebar::new(self.catalog.genres())
            .with_border(self.theme.get("sidebar_border"))
            .with_highlight(self.theme.get("accent"))
            .render(columns[0], buf, &mut self.sidebar);

        let notes = insights(&self.view);
        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Fill(1),
                Constraint::Length(notes.len() as u16 + 2),
            ])
            .split(columns[1]);

        MetricTiles::new(&self.view.metrics)
            .with_value_color(self.theme.get("accent"))
            .with_border(self.theme.get("dimmed"))
            .render(main[0], buf);

        self.render_panel(main[1], buf);

        let lines: Vec<Line> = notes
            .into_iter()
            .map(|note| Line::from(format!("• {}", note)))
            .collect();
        Paragraph::new(lines)
            .style(Style::default().fg(self.theme.get("text_primary")))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", self.view.selection)),
            )
            .render(main[2], buf);

        let controls = Controls::new()
            .with_status(self.status.as_deref())
            .with_background(self.theme.get("controls_bg"))
            .with_key_color(self.theme.get("accent"));
        (&controls).render(outer[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use polars::prelude::*;

    fn app() -> App {
        let raw = df!(
            "title" => &["R1", "R2", "R3"],
            "budget" => &[Some(0i64), Some(1_000_000), None],
            "revenue" => &[Some(10i64), Some(20), None],
            "vote_average" => &[Some(5.0), Some(7.0), None],
            "release_date" => &["1999-03-31", "2001-01-01", ""],
            "original_language" => &["en", "en", "fr"],
            "genres" => &[
                "[{'id': 28, 'name': 'Action'}, {'id': 35, 'name': 'Comedy'}]",
                "[{'id': 28, 'name': 'Action'}]",
                "[]",
            ],
            "production_companies" => &["[]", "[]", "[]"]
        )
        .unwrap();
        let export = ExportSettings {
            dir: std::env::temp_dir().join("moviedash-app-test"),
            size: (400, 300),
        };
        App::new(
            Catalog::prepare(&raw).unwrap(),
            DashboardOptions::default(),
            Theme::default(),
            export,
            &GenreSelection::All,
        )
        .unwrap()
    }

    fn press(app: &mut App, code: KeyCode) -> Option<AppEvent> {
        app.event(&AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    /// Feed follow-up events back in, as the main loop does.
    fn press_and_settle(app: &mut App, code: KeyCode) {
        let mut next = press(app, code);
        while let Some(event) = next {
            next = app.event(&event);
        }
    }

    #[test]
    fn moving_down_selects_genre() {
        let mut app = app();
        assert_eq!(app.view().metrics.movies, 3);
        assert_eq!(
            press(&mut app, KeyCode::Down),
            Some(AppEvent::Select(GenreSelection::Genre("Action".into())))
        );
        app.event(&AppEvent::Select(GenreSelection::Genre("Action".into())));
        assert_eq!(app.view().metrics.movies, 2);

        press_and_settle(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selection(), &GenreSelection::Genre("Comedy".into()));
        assert_eq!(app.view().metrics.movies, 1);
    }

    #[test]
    fn selection_stops_at_ends() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Up), None);
        press_and_settle(&mut app, KeyCode::End);
        assert_eq!(app.selection(), &GenreSelection::Genre("Comedy".into()));
        assert_eq!(press(&mut app, KeyCode::Down), None);
        press_and_settle(&mut app, KeyCode::Home);
        assert_eq!(app.selection(), &GenreSelection::All);
    }

    #[test]
    fn tabs_cycle_panels() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.panel(), Panel::Ratings);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.panel(), Panel::Preview);
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('q')), Some(AppEvent::Exit));
        assert_eq!(press(&mut app, KeyCode::Esc), Some(AppEvent::Exit));
        assert_eq!(press(&mut app, KeyCode::Char('e')), Some(AppEvent::Export));
    }

    #[test]
    fn export_key_writes_charts_and_reports_status() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = app();
        app.export.dir = dir.path().join("charts");
        assert_eq!(app.status(), None);

        press_and_settle(&mut app, KeyCode::Char('e'));
        let status = app.status().unwrap_or_default().to_string();
        assert!(status.starts_with("Wrote 5 charts"), "{}", status);
        assert!(dir.path().join("charts").join("top_languages.png").exists());

        // a new selection clears the message
        press_and_settle(&mut app, KeyCode::Down);
        assert_eq!(app.status(), None);
    }

    #[test]
    fn unknown_initial_genre_falls_back_to_all() {
        let app = app();
        let other = App::new(
            app.catalog.clone(),
            DashboardOptions::default(),
            Theme::default(),
            app.export.clone(),
            &GenreSelection::Genre("Western".into()),
        )
        .unwrap();
        assert!(other.selection().is_all());
    }

    #[test]
    fn renders_every_panel() {
        let mut app = app();
        let area = Rect::new(0, 0, 120, 40);
        for _ in Panel::ALL {
            let mut buf = Buffer::empty(area);
            (&mut app).render(area, &mut buf);
            press(&mut app, KeyCode::Tab);
        }
    }
}
