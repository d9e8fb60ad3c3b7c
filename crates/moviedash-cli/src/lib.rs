//! Shared CLI definitions for moviedash.
//!
//! Used by the main application and by the build script (manpage) and
//! gen_docs binary (command-line-options markdown).

use clap::{CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments for moviedash
#[derive(Clone, Parser, Debug)]
#[command(
    name = "moviedash",
    version,
    about = "Movie metadata dashboard in the terminal",
    long_about = include_str!("../long_about.txt")
)]
pub struct Args {
    /// Path to the movies CSV file.
    /// Optional when `data.path` is set in the config file or with --generate-config
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Start with this genre selected (exact, case-sensitive name). Default: all genres
    #[arg(long = "genre", value_name = "NAME")]
    pub genre: Option<String>,

    /// Print a text report for the selection and exit
    #[arg(long = "report", action)]
    pub report: bool,

    /// Write PNG charts for the selection into DIR and exit (combine with --report to also print)
    #[arg(long = "export-charts", value_name = "DIR")]
    pub export_charts: Option<PathBuf>,

    /// Print the genres available for filtering and exit
    #[arg(long = "list-genres", action)]
    pub list_genres: bool,

    /// Number of rows shown in the data preview (default: 20)
    #[arg(long = "preview-rows", value_name = "N")]
    pub preview_rows: Option<usize>,

    /// Number of languages and production companies kept in the top lists (default: 10)
    #[arg(long = "top-n", value_name = "N")]
    pub top_n: Option<usize>,

    /// Specify the delimiter to use when reading the file
    #[arg(long = "delimiter")]
    pub delimiter: Option<u8>,

    /// Specify that the file has no header
    #[arg(long = "no-header")]
    pub no_header: Option<bool>,

    /// Number of rows to use when inferring the CSV schema (default: 1000)
    #[arg(long = "infer-schema-length", value_name = "N")]
    pub infer_schema_length: Option<usize>,

    /// Enable debug logging
    #[arg(long = "debug", action)]
    pub debug: bool,

    /// Generate default configuration file at ~/.config/moviedash/config.toml
    #[arg(long = "generate-config", action)]
    pub generate_config: bool,

    /// Force overwrite existing config file when using --generate-config
    #[arg(long = "force", requires = "generate_config", action)]
    pub force: bool,
}

impl Args {
    /// True when the run prints or writes its output and exits instead of opening the UI.
    pub fn is_batch(&self) -> bool {
        self.report || self.export_charts.is_some() || self.list_genres
    }

    /// Header flag for the CSV reader, if given on the command line.
    pub fn has_header(&self) -> Option<bool> {
        self.no_header.map(|no_header| !no_header)
    }
}

/// Escape `|` and newlines for use in markdown table cells.
fn escape_table_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\n', '\r'], " ")
}

/// Render command-line options as markdown.
///
/// Used by the gen_docs binary; output is written to stdout.
pub fn render_options_markdown() -> String {
    let mut cmd = Args::command();
    cmd.build();

    let mut out = String::from("# Command Line Options\n\n");

    out.push_str("## Usage\n\n```\n");
    out.push_str(&cmd.render_usage().to_string());
    out.push_str("\n```\n\n");

    out.push_str("## Options\n\n");
    out.push_str("| Option | Description |\n");
    out.push_str("|--------|-------------|\n");

    for arg in cmd.get_arguments() {
        let id = arg.get_id().as_ref().to_string();
        if id == "help" || id == "version" {
            continue;
        }

        let placeholder: String = arg
            .get_value_names()
            .map(|names| {
                names
                    .iter()
                    .map(|n: &clap::builder::Str| format!("<{}>", n.as_ref() as &str))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();

        let option_str = if arg.is_positional() {
            if arg.is_required_set() {
                placeholder
            } else {
                format!("[{placeholder}]")
            }
        } else {
            let mut parts = Vec::new();
            if let Some(s) = arg.get_short() {
                parts.push(format!("-{s}"));
            }
            if let Some(l) = arg.get_long() {
                parts.push(format!("--{l}"));
            }
            let op = parts.join(", ");
            if arg.get_action().takes_values() && !placeholder.is_empty() {
                format!("{op} {placeholder}")
            } else {
                op
            }
        };

        let help = arg
            .get_help()
            .map(|h| escape_table_cell(&h.to_string()))
            .unwrap_or_else(|| "-".to_string());

        out.push_str(&format!("| `{option_str}` | {help} |\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_batch_flags() {
        let args = Args::parse_from([
            "moviedash",
            "movies.csv",
            "--genre",
            "Drama",
            "--report",
            "--top-n",
            "5",
        ]);
        assert_eq!(args.path, Some(PathBuf::from("movies.csv")));
        assert_eq!(args.genre.as_deref(), Some("Drama"));
        assert_eq!(args.top_n, Some(5));
        assert!(args.is_batch());
    }

    #[test]
    fn interactive_by_default() {
        let args = Args::parse_from(["moviedash", "movies.csv"]);
        assert!(!args.is_batch());
        assert_eq!(args.has_header(), None);
    }

    #[test]
    fn no_header_inverts() {
        let args = Args::parse_from(["moviedash", "movies.csv", "--no-header", "true"]);
        assert_eq!(args.has_header(), Some(false));
    }

    #[test]
    fn force_requires_generate_config() {
        assert!(Args::try_parse_from(["moviedash", "--force"]).is_err());
        assert!(Args::try_parse_from(["moviedash", "--generate-config", "--force"]).is_ok());
    }

    #[test]
    fn options_markdown_lists_flags() {
        let md = render_options_markdown();
        assert!(md.contains("`--genre <NAME>`"));
        assert!(md.contains("`--export-charts <DIR>`"));
        assert!(md.contains("`[<PATH>]`"));
        assert!(!md.contains("--help"));
    }
}
