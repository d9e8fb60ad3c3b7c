//! Reads the movies CSV into a `DataFrame` and memoizes it for the life of the process.

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use crate::columns::REQUIRED_COLUMNS;

/// CSV reader settings. `None` fields use the reader defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub delimiter: Option<u8>,
    pub has_header: Option<bool>,
    pub infer_schema_length: Option<usize>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_has_header(mut self, has_header: bool) -> Self {
        self.has_header = Some(has_header);
        self
    }

    pub fn with_infer_schema_length(mut self, n: usize) -> Self {
        self.infer_schema_length = Some(n);
        self
    }
}

/// Read the whole file. Errors if it is missing, unreadable, or lacks a required column.
pub fn load_movies(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    let started = Instant::now();

    let mut read_options = CsvReadOptions::default();
    if let Some(has_header) = options.has_header {
        read_options.has_header = has_header;
    }
    if let Some(n) = options.infer_schema_length {
        read_options.infer_schema_length = Some(n);
    }
    let delimiter = options.delimiter;
    read_options = read_options.map_parse_options(|opts| match delimiter {
        Some(d) => opts.with_separator(d),
        None => opts,
    });

    let df = read_options
        .try_into_reader_with_file_path(Some(path.into()))
        .and_then(|reader| reader.finish())
        .wrap_err_with(|| format!("Failed to load {}", path.display()))?;

    check_required_columns(&df)?;

    log::info!(
        "loaded {} rows x {} columns from {} in {:?}",
        df.height(),
        df.width(),
        path.display(),
        started.elapsed()
    );
    Ok(df)
}

fn check_required_columns(df: &DataFrame) -> Result<()> {
    let names = df.get_column_names();
    for required in REQUIRED_COLUMNS {
        if !names.iter().any(|name| name.as_str() == *required) {
            return Err(eyre!("Required column '{}' is missing", required));
        }
    }
    Ok(())
}

/// Loads the dataset on first use and hands out the same frame afterwards.
pub struct DatasetCache {
    path: PathBuf,
    options: LoadOptions,
    frame: OnceLock<Arc<DataFrame>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Self {
            path: path.into(),
            options,
            frame: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.frame.get().is_some()
    }

    /// The cached frame, loading it if this is the first call. A failed load is not cached.
    pub fn get(&self) -> Result<Arc<DataFrame>> {
        if let Some(df) = self.frame.get() {
            log::debug!("dataset cache hit for {}", self.path.display());
            return Ok(Arc::clone(df));
        }
        let df = Arc::new(load_movies(&self.path, &self.options)?);
        Ok(Arc::clone(self.frame.get_or_init(|| df)))
    }
}
