//! Row filters.
//!
//! Each filter keeps a subset of rows and never reorders them, so applying
//! filters one after another is the same as applying their conjunction.
//! Filters that cannot run because a required column is absent return
//! [`Outcome::Unavailable`] with the dataset untouched.

use itertools::Itertools;

use crate::{
    data::Value,
    dataset::Dataset,
    normalize::coerce_column,
    outcome::Outcome,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchCase {
    #[default]
    Sensitive,
    Insensitive,
}

/// Keeps rows whose first present `candidates` column contains `query`.
/// An empty query keeps every row. Missing cells never match.
pub fn substring(ds: Dataset, candidates: &[String], query: &str, case: MatchCase) -> Outcome {
    if query.is_empty() {
        return Outcome::Applied(ds);
    }
    let Some(column) = ds.first_present(candidates).map(str::to_string) else {
        return Outcome::unavailable(ds, candidates.to_vec());
    };
    let needle = match case {
        MatchCase::Sensitive => query.to_string(),
        MatchCase::Insensitive => query.to_lowercase(),
    };
    let idx = column_position(&ds, &column);
    Outcome::Applied(ds.retain_rows(|_, row| match &row[idx] {
        Value::Missing => false,
        value => {
            let haystack = value.as_display();
            match case {
                MatchCase::Sensitive => haystack.contains(&needle),
                MatchCase::Insensitive => haystack.to_lowercase().contains(&needle),
            }
        }
    }))
}

/// Splits a comma separated category cell into trimmed, non-empty tags.
pub fn split_categories(cell: &Value) -> Vec<String> {
    match cell {
        Value::Missing => Vec::new(),
        value => value
            .as_display()
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

/// Distinct categories across the dataset, sorted.
pub fn unique_categories(ds: &Dataset, column: &str) -> Vec<String> {
    ds.column_values(column)
        .into_iter()
        .flatten()
        .flat_map(split_categories)
        .sorted()
        .dedup()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySelection {
    All,
    Only(String),
}

pub fn category(ds: Dataset, column: &str, selection: &CategorySelection) -> Outcome {
    let CategorySelection::Only(wanted) = selection else {
        return Outcome::Applied(ds);
    };
    if !ds.has_column(column) {
        return Outcome::unavailable(ds, vec![column.to_string()]);
    }
    let idx = column_position(&ds, column);
    let wanted = wanted.trim();
    Outcome::Applied(
        ds.retain_rows(|_, row| split_categories(&row[idx]).iter().any(|tag| tag == wanted)),
    )
}

/// Keeps rows where any present `columns` value coerces to more than zero.
/// The evaluated columns are left coerced to numbers in the result.
pub fn nonzero(ds: Dataset, columns: &[String]) -> Outcome {
    let present = columns
        .iter()
        .filter(|column| ds.has_column(column))
        .cloned()
        .collect::<Vec<_>>();
    if present.is_empty() {
        return Outcome::unavailable(ds, columns.to_vec());
    }
    let ds = present.iter().fold(ds, |ds, column| coerce_column(ds, column));
    let indices = present
        .iter()
        .map(|column| column_position(&ds, column))
        .collect::<Vec<_>>();
    Outcome::Applied(ds.retain_rows(|_, row| {
        indices.iter().any(|idx| row[*idx].coerce_number() > 0.0)
    }))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    pub column: String,
    pub minimum: f64,
}

impl Threshold {
    pub fn new(column: impl Into<String>, minimum: f64) -> Self {
        Threshold {
            column: column.into(),
            minimum,
        }
    }
}

/// Keeps rows satisfying every `value >= minimum` pair.
pub fn threshold(ds: Dataset, thresholds: &[Threshold]) -> Outcome {
    let missing = thresholds
        .iter()
        .filter(|t| !ds.has_column(&t.column))
        .map(|t| t.column.clone())
        .unique()
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Outcome::unavailable(ds, missing);
    }
    let ds = thresholds
        .iter()
        .fold(ds, |ds, t| coerce_column(ds, &t.column));
    let checks = thresholds
        .iter()
        .map(|t| (column_position(&ds, &t.column), t.minimum))
        .collect::<Vec<_>>();
    Outcome::Applied(ds.retain_rows(|_, row| {
        checks
            .iter()
            .all(|(idx, minimum)| row[*idx].coerce_number() >= *minimum)
    }))
}

fn column_position(ds: &Dataset, column: &str) -> usize {
    // Callers check presence first.
    ds.column_index(column).unwrap_or(usize::MAX)
}
