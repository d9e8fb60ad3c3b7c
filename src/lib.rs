//! Movie metadata dashboard: load a TMDb-style CSV, unpack its nested genre and company
//! lists, and summarize it per genre as a terminal UI, a text report or PNG charts.

pub mod aggregate;
pub mod app;
pub mod chart_export;
pub mod cli;
pub mod columns;
pub mod config;
pub mod dashboard;
pub mod error_display;
pub mod expand;
pub mod filter;
pub mod loader;
pub mod nested;
pub mod normalize;
pub mod report;
pub mod widgets;

pub use app::{App, AppEvent, ExportSettings, Panel};
pub use cli::Args;
pub use config::{AppConfig, ColorParser, ConfigManager, Theme};
pub use dashboard::{insights, Catalog, DashboardOptions, DashboardView, Metrics};
pub use filter::GenreSelection;
pub use loader::{load_movies, DatasetCache, LoadOptions};

/// Application name used for the config directory and other app-specific paths
pub const APP_NAME: &str = "moviedash";
