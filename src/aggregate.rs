//! Stateless summaries over a movie table. Every function accepts an empty table and returns
//! zero or empty results for it.

use color_eyre::Result;
use polars::prelude::*;
use std::collections::HashSet;

use crate::columns::{BUDGET, COMPANY_NAME, ORIGINAL_LANGUAGE, RELEASE_YEAR, REVENUE, VOTE_AVERAGE};
use crate::expand::explode_list_column;

const COUNT: &str = "count";

/// Upper end of the rating scale.
pub const RATING_MAX: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// Half-open rating bin `[start, end)`; the last bin also holds `RATING_MAX`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

pub fn movie_count(df: &DataFrame) -> usize {
    df.height()
}

/// Sum of `budget`; absent values count as zero.
pub fn budget_sum(df: &DataFrame) -> Result<f64> {
    let budgets = float_values(df, BUDGET)?;
    Ok(budgets.into_iter().flatten().filter(|v| v.is_finite()).sum())
}

/// Mean of `vote_average` over present values, rounded to 2 decimals.
pub fn mean_rating(df: &DataFrame) -> Result<Option<f64>> {
    let ratings = float_values(df, VOTE_AVERAGE)?;
    let (sum, n) = ratings
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(round2(sum / n as f64)))
}

/// Rows per `release_year`, ascending by year. Rows without a year are dropped.
pub fn yearly_counts(df: &DataFrame) -> Result<Vec<YearCount>> {
    if df.height() == 0 {
        return Ok(Vec::new());
    }
    let out = df
        .clone()
        .lazy()
        .select([col(RELEASE_YEAR).cast(DataType::Int32)])
        .filter(col(RELEASE_YEAR).is_not_null())
        .group_by([col(RELEASE_YEAR)])
        .agg([len().alias(COUNT)])
        .sort_by_exprs(vec![col(RELEASE_YEAR)], SortMultipleOptions::default())
        .collect()?;

    let years = out.column(RELEASE_YEAR)?.i32()?;
    let counts = out.column(COUNT)?.cast(&DataType::UInt64)?;
    let counts = counts.u64()?;
    Ok(years
        .into_iter()
        .zip(counts)
        .filter_map(|(year, count)| {
            Some(YearCount {
                year: year?,
                count: count? as usize,
            })
        })
        .collect())
}

/// Year with the highest count. Ties go to the first entry, i.e. the earliest year of an
/// ascending histogram.
pub fn peak_year(histogram: &[YearCount]) -> Option<YearCount> {
    histogram
        .iter()
        .copied()
        .fold(None, |best: Option<YearCount>, yc| match best {
            Some(b) if b.count >= yc.count => Some(b),
            _ => Some(yc),
        })
}

/// The `n` most frequent non-null values of `column`, highest count first. Equal counts keep
/// the order in which the values first appear in the table.
fn top_counts(df: &DataFrame, column: &str, n: usize) -> Result<Vec<CategoryCount>> {
    if n == 0 || df.height() == 0 {
        return Ok(Vec::new());
    }
    let out = df
        .clone()
        .lazy()
        .select([col(column).cast(DataType::String)])
        .filter(col(column).is_not_null())
        .group_by_stable([col(column)])
        .agg([len().alias(COUNT)])
        .sort_by_exprs(
            vec![col(COUNT)],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .slice(0, n as IdxSize)
        .collect()?;

    let names = out.column(column)?.str()?;
    let counts = out.column(COUNT)?.cast(&DataType::UInt64)?;
    let counts = counts.u64()?;
    Ok(names
        .into_iter()
        .zip(counts)
        .filter_map(|(name, count)| {
            Some(CategoryCount {
                name: name?.to_string(),
                count: count? as usize,
            })
        })
        .collect())
}

/// Most frequent `original_language` values.
pub fn top_languages(df: &DataFrame, n: usize) -> Result<Vec<CategoryCount>> {
    top_counts(df, ORIGINAL_LANGUAGE, n)
}

/// Rows whose language is one of `languages`.
pub fn restrict_to_languages(df: &DataFrame, languages: &[CategoryCount]) -> Result<DataFrame> {
    let keep: HashSet<&str> = languages.iter().map(|c| c.name.as_str()).collect();
    let column = df.column(ORIGINAL_LANGUAGE)?.cast(&DataType::String)?;
    let mask: BooleanChunked = column
        .str()?
        .into_iter()
        .map(|lang| lang.is_some_and(|l| keep.contains(l)))
        .collect();
    Ok(df.filter(&mask)?)
}

/// Most frequent production companies. Expands `company_name` on its own, so a movie counts
/// once for each of its companies.
pub fn top_companies(df: &DataFrame, n: usize) -> Result<Vec<CategoryCount>> {
    if n == 0 || df.height() == 0 {
        return Ok(Vec::new());
    }
    let exploded = explode_list_column(df, COMPANY_NAME)?;
    top_counts(&exploded, COMPANY_NAME, n)
}

/// Fixed-width histogram of `vote_average` over `[0, RATING_MAX]`. Absent and out-of-range
/// ratings are skipped.
pub fn rating_histogram(df: &DataFrame, bins: usize) -> Result<Vec<RatingBin>> {
    if bins == 0 {
        return Ok(Vec::new());
    }
    let width = RATING_MAX / bins as f64;
    let mut out: Vec<RatingBin> = (0..bins)
        .map(|i| RatingBin {
            start: i as f64 * width,
            end: (i + 1) as f64 * width,
            count: 0,
        })
        .collect();
    for v in float_values(df, VOTE_AVERAGE)?.into_iter().flatten() {
        if !(0.0..=RATING_MAX).contains(&v) {
            continue;
        }
        let idx = ((v / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    Ok(out)
}

/// `(budget, revenue)` pairs where both are present, at most `limit` of them.
pub fn budget_revenue_points(df: &DataFrame, limit: Option<usize>) -> Result<Vec<(f64, f64)>> {
    let budgets = float_values(df, BUDGET)?;
    let revenues = float_values(df, REVENUE)?;
    let points = budgets
        .into_iter()
        .zip(revenues)
        .filter_map(|(b, r)| match (b, r) {
            (Some(b), Some(r)) if b.is_finite() && r.is_finite() => Some((b, r)),
            _ => None,
        })
        .take(limit.unwrap_or(usize::MAX))
        .collect();
    Ok(points)
}
