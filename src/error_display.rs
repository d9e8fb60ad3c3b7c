//! User-facing error message formatting.
//!
//! Matches on typed errors (PolarsError variants, io::ErrorKind, NestedFieldError) found in a
//! report's cause chain instead of parsing message text.

use color_eyre::eyre::Report;
use polars::prelude::PolarsError;
use std::io;

use crate::nested::NestedFieldError;

/// Format a PolarsError as a user-facing message by matching on its variant.
pub fn user_message_from_polars(err: &PolarsError) -> String {
    use polars::prelude::PolarsError as PE;

    match err {
        PE::ColumnNotFound(msg) => format!(
            "Column not found: {}. Check that the file is a movie metadata export.",
            msg
        ),
        PE::IO { error, msg } => {
            user_message_from_io(error.as_ref(), msg.as_ref().map(|m| m.as_ref()))
        }
        PE::NoData(msg) => format!("No data: {}", msg),
        PE::SchemaMismatch(msg) => format!("Schema mismatch: {}", msg),
        PE::ShapeMismatch(msg) => format!("Row shape mismatch: {}", msg),
        PE::InvalidOperation(msg) => format!("Operation not allowed: {}", msg),
        PE::OutOfBounds(msg) => format!("Index or row out of bounds: {}", msg),
        PE::ComputeError(msg) => format!("Could not read the data: {}", msg),
        PE::Context { error, msg } => {
            let inner = user_message_from_polars(error);
            format!("{}: {}", msg, inner)
        }
        #[allow(unreachable_patterns)]
        _ => err.to_string(),
    }
}

/// Format an io::Error as a user-facing message by matching on ErrorKind.
pub fn user_message_from_io(err: &io::Error, context: Option<&str>) -> String {
    use std::io::ErrorKind;

    let base: String = match err.kind() {
        ErrorKind::NotFound => "File or directory not found.".to_string(),
        ErrorKind::PermissionDenied => "Permission denied. Check read access.".to_string(),
        ErrorKind::InvalidData | ErrorKind::InvalidInput => {
            "Invalid or corrupted data.".to_string()
        }
        ErrorKind::UnexpectedEof => "Unexpected end of file.".to_string(),
        ErrorKind::OutOfMemory => "Out of memory.".to_string(),
        ErrorKind::Other => {
            let msg = err.to_string();
            if msg.contains("Is a directory") {
                return "Path is a directory, not a file.".to_string();
            }
            return match context {
                Some(_) => format!("I/O error: {}", msg),
                None => msg,
            };
        }
        _ => err.to_string(),
    };

    match context {
        Some(ctx) if !ctx.is_empty() => format!("{} {}", base, ctx),
        _ => base,
    }
}

/// Format a malformed nested cell. `context` is the message the normalizer wrapped it with,
/// which already names the column and row.
pub fn user_message_from_nested(err: &NestedFieldError, context: &str) -> String {
    if context.is_empty() {
        format!("Malformed genre or company list: {}", err)
    } else {
        format!("{}. The dataset is not a valid movie metadata export.", context)
    }
}

/// Format a color_eyre Report by downcasting to known error types.
/// Walks the cause chain; `path` prefixes load failures.
pub fn user_message(report: &Report, path: Option<&std::path::Path>) -> String {
    let with_path = |msg: String| match path {
        Some(p) => format!("Failed to load {}: {}", p.display(), msg),
        None => msg,
    };

    for cause in report.chain() {
        if let Some(ne) = cause.downcast_ref::<NestedFieldError>() {
            return user_message_from_nested(ne, &first_line(report));
        }
        if let Some(pe) = cause.downcast_ref::<PolarsError>() {
            return with_path(user_message_from_polars(pe));
        }
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return with_path(user_message_from_io(io_err, None));
        }
    }

    first_line(report)
}

// Avoid long tracebacks: only the outermost message's first line.
fn first_line(report: &Report) -> String {
    let display = report.to_string();
    display
        .lines()
        .next()
        .map(str::trim)
        .unwrap_or("An error occurred")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::WrapErr;

    #[test]
    fn io_not_found() {
        let err = io::Error::new(io::ErrorKind::NotFound, "No such file");
        let msg = user_message_from_io(&err, None);
        assert!(msg.contains("not found"), "got: {}", msg);
    }

    #[test]
    fn io_permission_denied() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied");
        let msg = user_message_from_io(&err, None);
        assert!(msg.to_lowercase().contains("permission"), "got: {}", msg);
    }

    #[test]
    fn polars_column_not_found() {
        let err = PolarsError::ColumnNotFound("budget".into());
        let msg = user_message_from_polars(&err);
        assert!(msg.contains("budget"), "got: {}", msg);
        assert!(msg.contains("Column not found"), "got: {}", msg);
    }

    #[test]
    fn report_with_io_cause_names_path() {
        let report: Report = Err::<(), _>(io::Error::new(io::ErrorKind::NotFound, "gone"))
            .wrap_err("opening movies")
            .unwrap_err();
        let msg = user_message(&report, Some(std::path::Path::new("movies.csv")));
        assert!(msg.starts_with("Failed to load movies.csv"), "got: {}", msg);
        assert!(msg.contains("not found"), "got: {}", msg);
    }

    #[test]
    fn report_with_nested_cause_keeps_row_context() {
        let err = NestedFieldError::NotAList {
            found: "an object",
        };
        let report =
            Report::new(err).wrap_err("Malformed value in column 'genres' at row 4: not a list");
        let msg = user_message(&report, None);
        assert!(msg.contains("'genres'"), "got: {}", msg);
        assert!(msg.contains("row 4"), "got: {}", msg);
    }

    #[test]
    fn plain_report_uses_first_line() {
        let report = color_eyre::eyre::eyre!("Required column 'title' is missing\nmore detail");
        assert_eq!(
            user_message(&report, None),
            "Required column 'title' is missing"
        );
    }
}
