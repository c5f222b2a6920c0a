//! Cell values and numeric coercion.
//!
//! Every cell in a [`crate::dataset::Dataset`] is a [`Value`]: text, a number,
//! or missing. Columns are never assumed to be typed; callers coerce on demand
//! through [`Value::coerce_number`], which maps anything unparseable to zero.

use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Missing,
}

impl Value {
    /// Parses a raw CSV field. Empty fields are missing, numeric-looking fields
    /// become numbers, everything else stays text.
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Value::Missing;
        }
        match parse_number(raw) {
            Some(number) => Value::Number(number),
            None => Value::Text(raw.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Best-effort numeric view of the cell: text is parsed, and anything that
    /// still does not yield a finite number becomes `0.0`.
    pub fn coerce_number(&self) -> f64 {
        match self {
            Value::Number(n) if n.is_finite() => *n,
            Value::Number(_) | Value::Missing => 0.0,
            Value::Text(s) => parse_number(s).unwrap_or(0.0),
        }
    }

    /// Like [`Value::coerce_number`] but keeps missing cells distinguishable.
    pub fn coerce_present(&self) -> Option<f64> {
        match self {
            Value::Missing => None,
            other => Some(other.coerce_number()),
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => format_number(*n),
            Value::Missing => String::new(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Ascending order used by the sort engine. Cells compare by their coerced
/// number, so numbers stored as text order numerically. Among equal values
/// unparseable text ranks below numbers and then by string. Missing cells
/// rank lowest; the sort engine moves them last in either direction.
pub fn compare_present(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Missing, Value::Missing) => return Ordering::Equal,
        (Value::Missing, _) => return Ordering::Less,
        (_, Value::Missing) => return Ordering::Greater,
        _ => {}
    }
    left.coerce_number()
        .total_cmp(&right.coerce_number())
        .then_with(|| match (unparsed_text(left), unparsed_text(right)) {
            (None, None) => Ordering::Equal,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(a), Some(b)) => a.cmp(b),
        })
}

fn unparsed_text(value: &Value) -> Option<&str> {
    match value {
        Value::Text(s) if parse_number(s).is_none() => Some(s),
        _ => None,
    }
}

pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Rounds half away from zero to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let rounded = (value * 10.0).round() / 10.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
