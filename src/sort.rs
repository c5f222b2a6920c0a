use std::cmp::Ordering;

use thiserror::Error;

use crate::{
    data::{Value, compare_present},
    dataset::Dataset,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SortError {
    #[error("sort column '{0}' not found")]
    ColumnNotFound(String),
}

/// Orders rows by `column`, largest first. Cells compare by their numeric
/// value even when the column is stored as text. The sort is stable, so rows
/// with equal keys keep their input order; missing cells always go last.
pub fn sort_descending(mut ds: Dataset, column: &str) -> Result<Dataset, SortError> {
    sort_rows_descending(&mut ds, column)?;
    Ok(ds)
}

/// In-place variant of [`sort_descending`]; on error the rows are untouched.
pub fn sort_rows_descending(ds: &mut Dataset, column: &str) -> Result<(), SortError> {
    let idx = ds
        .column_index(column)
        .ok_or_else(|| SortError::ColumnNotFound(column.to_string()))?;
    ds.rows_mut()
        .sort_by(|a, b| compare_descending(&a[idx], &b[idx]));
    Ok(())
}

fn compare_descending(left: &Value, right: &Value) -> Ordering {
    match (left.is_missing(), right.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => compare_present(left, right).reverse(),
    }
}
