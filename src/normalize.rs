//! Column normalisation applied once to a freshly loaded snapshot.
//!
//! Every step is a no-op when its input column is missing, and the whole
//! pass is idempotent: normalising an already normalised dataset returns it
//! unchanged.

use log::debug;

use crate::{
    data::{Value, round_one_decimal},
    dataset::Dataset,
    profile::Profile,
};

pub fn normalize(ds: Dataset, profile: &Profile) -> Dataset {
    let mut ds = ds;
    for column in &profile.deprecated_columns {
        if ds.has_column(column) {
            debug!("Dropping deprecated column '{column}'");
            ds = ds.drop_column(column);
        }
    }
    for column in &profile.numeric_columns {
        ds = if *column == profile.metrics.avg_position {
            coerce_present_column(ds, column)
        } else {
            coerce_column(ds, column)
        };
    }
    // The delta is derived from rounded ranks so a second pass reproduces it.
    ds = round_numeric_columns(ds);
    ds = with_rank_delta(ds, profile);
    ds = ds.move_columns_after(&profile.pivot_column, &profile.new_columns);
    with_page_view_shadow(ds, profile)
}

/// Forces a column to numbers; unparseable and empty cells become 0.
pub fn coerce_column(ds: Dataset, column: &str) -> Dataset {
    ds.map_column(column, |value| Value::Number(value.coerce_number()))
}

/// Like [`coerce_column`] but leaves blank cells missing.
pub fn coerce_present_column(ds: Dataset, column: &str) -> Dataset {
    ds.map_column(column, |value| match value {
        Value::Missing => Value::Missing,
        other => Value::Number(other.coerce_number()),
    })
}

pub fn round_numeric_columns(ds: Dataset) -> Dataset {
    let numeric = ds
        .columns()
        .iter()
        .filter(|name| ds.is_numeric_column(name))
        .cloned()
        .collect::<Vec<_>>();
    numeric.iter().fold(ds, |ds, column| {
        ds.map_column(column, |value| match value {
            Value::Number(n) => Value::Number(round_one_decimal(*n)),
            other => other.clone(),
        })
    })
}

fn with_rank_delta(ds: Dataset, profile: &Profile) -> Dataset {
    let ranking = &profile.ranking;
    if !ds.has_column(&ranking.seven_day) || !ds.has_column(&ranking.thirty_day) {
        return ds;
    }
    let deltas = (0..ds.row_count())
        .map(|row| {
            let seven = ds.value(row, &ranking.seven_day).map(Value::coerce_number);
            let thirty = ds.value(row, &ranking.thirty_day).map(Value::coerce_number);
            let delta = ranking
                .convention
                .delta(seven.unwrap_or(0.0), thirty.unwrap_or(0.0));
            Value::Number(round_one_decimal(delta))
        })
        .collect();
    ds.set_column(&ranking.delta, deltas)
}

fn with_page_view_shadow(ds: Dataset, profile: &Profile) -> Dataset {
    if !ds.has_column(&profile.metrics.page_view) {
        return ds;
    }
    let shadow = ds
        .column_values(&profile.metrics.page_view)
        .into_iter()
        .flatten()
        .map(|value| Value::Number(value.coerce_number()))
        .collect::<Vec<_>>();
    ds.set_column(&profile.page_view_shadow(), shadow)
}

/// Sum of the numeric page_view shadow, when the dataset has one.
pub fn page_view_total(ds: &Dataset, profile: &Profile) -> Option<f64> {
    let shadow = profile.page_view_shadow();
    let total = match ds.column_values(&shadow) {
        Some(values) => values.map(Value::coerce_number).sum::<f64>(),
        None => ds
            .column_values(&profile.metrics.page_view)?
            .map(Value::coerce_number)
            .sum::<f64>(),
    };
    Some(round_one_decimal(total))
}
