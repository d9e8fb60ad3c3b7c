//! Glue between command-line arguments and the config/load layers.

use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

pub use moviedash_cli::Args;

use crate::config::{AppConfig, DataConfig};
use crate::filter::GenreSelection;
use crate::loader::LoadOptions;

/// Command-line values take precedence over the config file.
pub fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(n) = args.preview_rows {
        config.dashboard.preview_rows = n;
    }
    if let Some(n) = args.top_n {
        config.dashboard.top_n = n;
    }
    config.data.merge(DataConfig {
        path: None,
        delimiter: args.delimiter,
        has_header: args.has_header(),
        infer_schema_length: args.infer_schema_length,
    });
}

impl From<&DataConfig> for LoadOptions {
    fn from(data: &DataConfig) -> Self {
        let mut opts = LoadOptions::new();
        if let Some(delimiter) = data.delimiter {
            opts = opts.with_delimiter(delimiter);
        }
        if let Some(has_header) = data.has_header {
            opts = opts.with_has_header(has_header);
        }
        if let Some(n) = data.infer_schema_length {
            opts = opts.with_infer_schema_length(n);
        }
        opts
    }
}

/// Dataset path: the positional argument, else `data.path` from the config.
pub fn dataset_path(args: &Args, config: &AppConfig) -> Option<PathBuf> {
    args.path
        .clone()
        .or_else(|| config.data.path.as_ref().map(PathBuf::from))
}

/// Initial genre selection from `--genre`.
pub fn initial_selection(args: &Args) -> GenreSelection {
    args.genre
        .as_deref()
        .map(|g| GenreSelection::from_str(g).unwrap_or_default())
        .unwrap_or_default()
}

/// Base log level before RUST_LOG: debug with `--debug`, the configured level for batch runs,
/// and off for the dashboard.
pub fn log_level(args: &Args, config: &AppConfig) -> LevelFilter {
    if args.debug {
        LevelFilter::Debug
    } else if args.is_batch() {
        config.debug.level_filter().unwrap_or(LevelFilter::Info)
    } else {
        LevelFilter::Off
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("moviedash").chain(argv.iter().copied()))
    }

    #[test]
    fn overrides_take_precedence() {
        let mut config = AppConfig::default();
        config.data.delimiter = Some(b';');
        config.data.infer_schema_length = Some(500);
        let args = parse(&[
            "movies.csv",
            "--top-n",
            "5",
            "--delimiter",
            "9",
            "--no-header",
            "true",
        ]);
        apply_overrides(&mut config, &args);
        assert_eq!(config.dashboard.top_n, 5);
        assert_eq!(config.dashboard.preview_rows, 20);
        assert_eq!(config.data.delimiter, Some(b'\t'));
        assert_eq!(config.data.has_header, Some(false));
        assert_eq!(config.data.infer_schema_length, Some(500));

        let opts = LoadOptions::from(&config.data);
        assert_eq!(opts.delimiter, Some(b'\t'));
        assert_eq!(opts.has_header, Some(false));
        assert_eq!(opts.infer_schema_length, Some(500));
    }

    #[test]
    fn path_falls_back_to_config() {
        let mut config = AppConfig::default();
        assert_eq!(dataset_path(&parse(&[]), &config), None);
        config.data.path = Some("/data/movies.csv".to_string());
        assert_eq!(
            dataset_path(&parse(&[]), &config),
            Some(PathBuf::from("/data/movies.csv"))
        );
        assert_eq!(
            dataset_path(&parse(&["other.csv"]), &config),
            Some(PathBuf::from("other.csv"))
        );
    }

    #[test]
    fn genre_flag_selects() {
        assert_eq!(initial_selection(&parse(&[])), GenreSelection::All);
        assert_eq!(
            initial_selection(&parse(&["--genre", "Drama"])),
            GenreSelection::Genre("Drama".into())
        );
        assert_eq!(
            initial_selection(&parse(&["--genre", "all"])),
            GenreSelection::All
        );
    }

    #[test]
    fn dashboard_is_silent_unless_debugging() {
        let mut config = AppConfig::default();
        config.debug.log_level = "warn".to_string();
        assert_eq!(log_level(&parse(&["m.csv"]), &config), LevelFilter::Off);
        assert_eq!(
            log_level(&parse(&["m.csv", "--debug"]), &config),
            LevelFilter::Debug
        );
        assert_eq!(
            log_level(&parse(&["m.csv", "--report"]), &config),
            LevelFilter::Warn
        );
        assert_eq!(
            log_level(&parse(&["m.csv", "--list-genres", "--debug"]), &config),
            LevelFilter::Debug
        );
    }
}
