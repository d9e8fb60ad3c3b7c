//! One-row-per-element expansion of a list column.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use polars::prelude::*;

/// Replicate each row once per element of `column`'s list (once with a null if the list is
/// empty or null). The list column becomes a scalar column of the inner type; the other
/// columns are copied onto every replica. Row order is preserved.
pub fn explode_list_column(df: &DataFrame, column: &str) -> Result<DataFrame> {
    let source = df.column(column)?;
    let inner = match source.dtype() {
        DataType::List(inner) => inner.as_ref().clone(),
        other => {
            return Err(eyre!(
                "Column '{}' is {}, expected a list column",
                column,
                other
            ))
        }
    };

    let ca = source.list()?;
    let mut indices: Vec<IdxSize> = Vec::with_capacity(df.height());
    let mut values = Series::new_empty(column.into(), &inner);
    let null = Series::full_null(column.into(), 1, &inner);

    for (row, cell) in ca.into_iter().enumerate() {
        let row = row as IdxSize;
        match cell {
            Some(items) if !items.is_empty() => {
                indices.extend(std::iter::repeat(row).take(items.len()));
                values.append(&items)?;
            }
            _ => {
                indices.push(row);
                values.append(&null)?;
            }
        }
    }

    let idx = IdxCa::from_vec(PlSmallStr::EMPTY, indices);
    let mut out = df.take(&idx)?;
    out.with_column(values.rechunk())?;
    Ok(out)
}
