//! Column names of the movie table, source and derived.

pub const TITLE: &str = "title";
pub const BUDGET: &str = "budget";
pub const REVENUE: &str = "revenue";
pub const VOTE_AVERAGE: &str = "vote_average";
pub const RELEASE_DATE: &str = "release_date";
pub const ORIGINAL_LANGUAGE: &str = "original_language";
pub const GENRES: &str = "genres";
pub const PRODUCTION_COMPANIES: &str = "production_companies";

/// Year of `release_date`; null when the date is missing or unparseable.
pub const RELEASE_YEAR: &str = "release_year";
/// Names decoded from `genres`.
pub const GENRE_NAME: &str = "genre_name";
/// Names decoded from `production_companies`.
pub const COMPANY_NAME: &str = "company_name";

/// Columns the loader insists on.
pub const REQUIRED_COLUMNS: &[&str] = &[
    TITLE,
    BUDGET,
    REVENUE,
    VOTE_AVERAGE,
    RELEASE_DATE,
    ORIGINAL_LANGUAGE,
    GENRES,
    PRODUCTION_COMPANIES,
];

/// Nested list columns and the name column derived from each.
pub const NESTED_COLUMNS: &[(&str, &str)] = &[
    (GENRES, GENRE_NAME),
    (PRODUCTION_COMPANIES, COMPANY_NAME),
];

/// Columns shown in the preview table, in display order.
pub const PREVIEW_COLUMNS: &[&str] = &[
    TITLE,
    RELEASE_DATE,
    ORIGINAL_LANGUAGE,
    GENRE_NAME,
    BUDGET,
    REVENUE,
    VOTE_AVERAGE,
];
