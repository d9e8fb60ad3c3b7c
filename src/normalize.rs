//! Column transformations applied once to the raw frame: nested list decoding and release year.

use color_eyre::{Report, Result};
use polars::prelude::*;
use std::collections::HashSet;

use crate::columns::{NESTED_COLUMNS, RELEASE_DATE, RELEASE_YEAR};
use crate::nested::{decode_named_list, NamedEntity};

/// Decode every cell of `source`. Errors name the column and the 0-based row.
pub fn decode_column(df: &DataFrame, source: &str) -> Result<Vec<Vec<NamedEntity>>> {
    let column = df.column(source)?.cast(&DataType::String)?;
    let ca = column.str()?;
    ca.into_iter()
        .enumerate()
        .map(|(row, cell)| {
            decode_named_list(cell).map_err(|e| {
                let reason = e.to_string();
                Report::new(e).wrap_err(format!(
                    "Malformed value in column '{}' at row {}: {}",
                    source, row, reason
                ))
            })
        })
        .collect()
}

/// Drop entities whose name already appeared earlier in the same cell.
fn dedup_by_name(entities: Vec<NamedEntity>) -> Vec<NamedEntity> {
    let mut seen = HashSet::new();
    entities
        .into_iter()
        .filter(|e| seen.insert(e.name.clone()))
        .collect()
}

/// Replace `source` with a list of entity ids and add `target` with the entity names, in order.
/// Absent and empty cells become empty lists. A name repeated within a cell is kept once, so
/// exploding `target` yields at most one row per movie and name.
pub fn normalize_nested_column(df: &DataFrame, source: &str, target: &str) -> Result<DataFrame> {
    let decoded: Vec<Vec<NamedEntity>> = decode_column(df, source)?
        .into_iter()
        .map(dedup_by_name)
        .collect();
    let n = decoded.len();
    let total: usize = decoded.iter().map(Vec::len).sum();

    let mut ids =
        ListPrimitiveChunkedBuilder::<Int64Type>::new(source.into(), n, total, DataType::Int64);
    let mut names = ListStringChunkedBuilder::new(target.into(), n, total);
    for entities in &decoded {
        let row_ids: Vec<Option<i64>> = entities.iter().map(|e| e.id).collect();
        let row_names: Vec<&str> = entities.iter().map(|e| e.name.as_str()).collect();
        ids.append_series(&Series::new(PlSmallStr::EMPTY, row_ids))?;
        names.append_series(&Series::new(PlSmallStr::EMPTY, row_names))?;
    }

    let mut out = df.clone();
    out.with_column(ids.finish().into_series())?;
    out.with_column(names.finish().into_series())?;
    Ok(out)
}

/// Add `release_year` (Int32). Unparseable or missing dates give null, never a sentinel.
pub fn derive_release_year(df: &DataFrame) -> Result<DataFrame> {
    let dtype = df.column(RELEASE_DATE)?.dtype().clone();
    let year = match dtype {
        DataType::Date | DataType::Datetime(_, _) => col(RELEASE_DATE).dt().year(),
        _ => {
            let opts = StrptimeOptions {
                format: Some("%Y-%m-%d".into()),
                strict: false,
                exact: false,
                cache: true,
            };
            col(RELEASE_DATE)
                .cast(DataType::String)
                .str()
                .to_date(opts)
                .dt()
                .year()
        }
    };
    let out = df
        .clone()
        .lazy()
        .with_column(year.alias(RELEASE_YEAR))
        .collect()?;
    Ok(out)
}

/// Normalize the genre and production company columns.
pub fn normalize_nested_columns(df: &DataFrame) -> Result<DataFrame> {
    let mut out = df.clone();
    for (source, target) in NESTED_COLUMNS {
        out = normalize_nested_column(&out, source, target)?;
    }
    Ok(out)
}

/// Full normalization: both nested columns, then the release year.
pub fn normalize(df: &DataFrame) -> Result<DataFrame> {
    derive_release_year(&normalize_nested_columns(df)?)
}

/// Names held in row `row` of a list-of-strings column.
pub fn list_names(df: &DataFrame, column: &str, row: usize) -> Result<Vec<String>> {
    let ca = df.column(column)?.list()?;
    let Some(inner) = ca.get_as_series(row) else {
        return Ok(Vec::new());
    };
    let names = inner
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{COMPANY_NAME, GENRES, GENRE_NAME, PRODUCTION_COMPANIES};

    fn raw() -> DataFrame {
        df!(
            "title" => &["R1", "R2", "R3"],
            "genres" => &[
                Some("[{'id': 28, 'name': 'Action'}, {'id': 35, 'name': 'Comedy'}]"),
                Some("[{'id': 28, 'name': 'Action'}]"),
                None,
            ],
            "production_companies" => &[Some("[{'id': 1, 'name': 'Warner Bros.'}]"), Some(""), Some("[]")],
            "release_date" => &[Some("1999-03-31"), Some("not a date"), None]
        )
        .unwrap()
    }

    #[test]
    fn nested_columns_become_lists() {
        let df = normalize(&raw()).unwrap();
        assert_eq!(
            list_names(&df, GENRE_NAME, 0).unwrap(),
            vec!["Action".to_string(), "Comedy".to_string()]
        );
        assert_eq!(list_names(&df, GENRE_NAME, 1).unwrap(), vec!["Action"]);
        assert!(list_names(&df, GENRE_NAME, 2).unwrap().is_empty());
        assert_eq!(list_names(&df, COMPANY_NAME, 0).unwrap(), vec!["Warner Bros."]);
        assert!(list_names(&df, COMPANY_NAME, 1).unwrap().is_empty());
        assert!(list_names(&df, COMPANY_NAME, 2).unwrap().is_empty());
    }

    #[test]
    fn absent_cells_are_never_null() {
        let df = normalize(&raw()).unwrap();
        for name in [GENRES, GENRE_NAME, PRODUCTION_COMPANIES, COMPANY_NAME] {
            let column = df.column(name).unwrap();
            assert!(matches!(column.dtype(), DataType::List(_)), "{name}");
            assert_eq!(column.null_count(), 0, "{name}");
        }
    }

    #[test]
    fn ids_follow_names() {
        let df = normalize(&raw()).unwrap();
        let ids = df.column(GENRES).unwrap().list().unwrap();
        let first = ids.get_as_series(0).unwrap();
        let first: Vec<Option<i64>> = first.i64().unwrap().into_iter().collect();
        assert_eq!(first, vec![Some(28), Some(35)]);
    }

    #[test]
    fn repeated_names_in_a_cell_are_kept_once() {
        let df = df!(
            "genres" => &["[{'id': 28, 'name': 'Action'}, {'id': 12, 'name': 'Adventure'}, {'id': 28, 'name': 'Action'}]"],
            "production_companies" => &["[{'id': 5, 'name': 'Columbia Pictures'}, {'name': 'Columbia Pictures'}]"],
            "release_date" => &["2000-01-01"]
        )
        .unwrap();
        let df = normalize(&df).unwrap();
        assert_eq!(list_names(&df, GENRE_NAME, 0).unwrap(), vec!["Action", "Adventure"]);
        assert_eq!(list_names(&df, COMPANY_NAME, 0).unwrap(), vec!["Columbia Pictures"]);
        let ids = df.column(GENRES).unwrap().list().unwrap().get_as_series(0).unwrap();
        let ids: Vec<Option<i64>> = ids.i64().unwrap().into_iter().collect();
        assert_eq!(ids, vec![Some(28), Some(12)]);
    }

    #[test]
    fn malformed_cell_reports_row() {
        let df = df!(
            "genres" => &["[]", "[{'id': 1, 'name': 'A'"],
            "production_companies" => &["[]", "[]"],
            "release_date" => &["2000-01-01", "2000-01-01"]
        )
        .unwrap();
        let err = normalize(&df).unwrap_err().to_string();
        assert!(err.contains("'genres'"), "{err}");
        assert!(err.contains("row 1"), "{err}");
    }

    #[test]
    fn release_year_is_null_when_unparseable() {
        let df = normalize(&raw()).unwrap();
        let years: Vec<Option<i32>> = df
            .column(RELEASE_YEAR)
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(years, vec![Some(1999), None, None]);
    }
}
