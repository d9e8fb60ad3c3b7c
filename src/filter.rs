//! Genre selection over the genre-expanded frame.

use color_eyre::Result;
use polars::prelude::*;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::columns::GENRE_NAME;

pub const ALL_GENRES_LABEL: &str = "All genres";

/// The single sidebar control: everything, or one genre by exact name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenreSelection {
    #[default]
    All,
    Genre(String),
}

impl GenreSelection {
    pub fn is_all(&self) -> bool {
        matches!(self, GenreSelection::All)
    }
}

impl fmt::Display for GenreSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenreSelection::All => f.write_str(ALL_GENRES_LABEL),
            GenreSelection::Genre(name) => f.write_str(name),
        }
    }
}

impl FromStr for GenreSelection {
    type Err = std::convert::Infallible;

    /// `""`, `"all"` and `"All genres"` (any case) select everything; anything else is a
    /// genre name, trimmed but otherwise exact.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("all")
            || trimmed.eq_ignore_ascii_case(ALL_GENRES_LABEL)
        {
            Ok(GenreSelection::All)
        } else {
            Ok(GenreSelection::Genre(trimmed.to_string()))
        }
    }
}

/// Sorted distinct non-null genre names of the expanded frame.
pub fn genre_candidates(exploded: &DataFrame) -> Result<Vec<String>> {
    let ca = exploded.column(GENRE_NAME)?.str()?;
    let names: BTreeSet<&str> = ca.into_iter().flatten().collect();
    Ok(names.into_iter().map(str::to_string).collect())
}

/// Rows of the expanded frame matching the selection (case-sensitive exact match). `All`
/// returns the expanded frame unchanged.
pub fn apply_genre_filter(exploded: &DataFrame, selection: &GenreSelection) -> Result<DataFrame> {
    match selection {
        GenreSelection::All => Ok(exploded.clone()),
        GenreSelection::Genre(name) => {
            let filtered = exploded
                .clone()
                .lazy()
                .filter(col(GENRE_NAME).eq(lit(name.as_str())))
                .collect()?;
            Ok(filtered)
        }
    }
}
