//! Derived metrics used to prioritise articles.
//!
//! Each formula is a plain function over explicit numeric inputs, and
//! [`score`] applies one of them across a dataset, writing a single derived
//! column that replaces any earlier column of the same name. Input columns
//! are named by [`MetricColumns`]. Inputs are
//! coerced with a zero default; the only exception is `avg_position` in
//! [`rewrite_priority`], which defaults to [`MISSING_AVG_POSITION`] so rows
//! without a rank sink to the bottom.

use std::{fmt, str::FromStr};

use log::debug;

use crate::{
    data::{Value, round_one_decimal},
    dataset::Dataset,
    outcome::Outcome,
    profile::MetricColumns,
};

pub const MISSING_AVG_POSITION: f64 = 9999.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Formula {
    RewritePriority,
    GrowthRate,
    CvrAvgPos,
    ImpRevenue,
}

impl Formula {
    pub const ALL: [Formula; 4] = [
        Formula::RewritePriority,
        Formula::GrowthRate,
        Formula::CvrAvgPos,
        Formula::ImpRevenue,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Formula::RewritePriority => "rewrite_priority",
            Formula::GrowthRate => "growth_rate",
            Formula::CvrAvgPos => "cvravgpos_score",
            Formula::ImpRevenue => "imp_revenue_score",
        }
    }

    /// Columns that must exist for the formula to be computed at all.
    pub fn required_columns(self, metrics: &MetricColumns) -> Vec<&str> {
        match self {
            Formula::RewritePriority => Vec::new(),
            Formula::GrowthRate => vec![metrics.page_view.as_str()],
            Formula::CvrAvgPos => vec![
                metrics.cv.as_str(),
                metrics.click.as_str(),
                metrics.avg_position.as_str(),
            ],
            Formula::ImpRevenue => vec![metrics.imp.as_str()],
        }
    }

    /// Whether the operator action for this formula also sorts by it.
    pub fn sorts_after_compute(self) -> bool {
        !matches!(self, Formula::GrowthRate)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Formula {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "rewrite-priority" => Ok(Formula::RewritePriority),
            "growth-rate" => Ok(Formula::GrowthRate),
            "cvravgpos" | "cvravgpos-score" => Ok(Formula::CvrAvgPos),
            "imp-revenue" | "imp-revenue-score" => Ok(Formula::ImpRevenue),
            other => Err(format!("Unknown formula '{other}'")),
        }
    }
}

/// `ln(sales+1) + cv + 0.5·ln(page_view+1) − 0.2·avg_position`, with the
/// first three inputs clamped at zero.
pub fn rewrite_priority(sales: f64, cv: f64, page_view: f64, avg_position: Option<f64>) -> f64 {
    let sales = sales.max(0.0);
    let cv = cv.max(0.0);
    let page_view = page_view.max(0.0);
    let avg_position = avg_position.unwrap_or(MISSING_AVG_POSITION);
    sales.ln_1p() * 1.0 + cv * 1.0 + page_view.ln_1p() * 0.5 - avg_position * 0.2
}

pub fn growth_rate(page_view: f64) -> f64 {
    round_one_decimal(((page_view + 1.0) / (page_view + 5.0) - 1.0) * 100.0)
}

pub fn cvravgpos_score(cv: f64, click: f64, avg_position: f64) -> f64 {
    let cvr = if click > 0.0 { cv / click } else { 0.0 };
    cvr / (avg_position + 1.0)
}

pub fn imp_revenue_score(imp: f64, sales: f64, cv: f64) -> f64 {
    imp * if sales > 0.0 { sales } else { cv }
}

/// Computes `formula` for every row and stores it under [`Formula::column`].
pub fn score(ds: Dataset, formula: Formula, metrics: &MetricColumns) -> Outcome {
    let missing = formula
        .required_columns(metrics)
        .into_iter()
        .filter(|column| !ds.has_column(column))
        .map(str::to_string)
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Outcome::unavailable(ds, missing);
    }

    let inputs = Inputs::new(&ds, metrics);
    let values = (0..ds.row_count())
        .map(|row| {
            let number = |idx: Option<usize>| inputs.present(&ds, row, idx).unwrap_or(0.0);
            let score = match formula {
                Formula::RewritePriority => rewrite_priority(
                    number(inputs.sales),
                    number(inputs.cv),
                    number(inputs.page_view),
                    inputs.present(&ds, row, inputs.avg_position),
                ),
                Formula::GrowthRate => growth_rate(number(inputs.page_view)),
                Formula::CvrAvgPos => cvravgpos_score(
                    number(inputs.cv),
                    number(inputs.click),
                    number(inputs.avg_position),
                ),
                Formula::ImpRevenue => imp_revenue_score(
                    number(inputs.imp),
                    number(inputs.sales),
                    number(inputs.cv),
                ),
            };
            // Guards against an inf/NaN leaking into the sort key.
            Value::Number(if score.is_finite() { score } else { 0.0 })
        })
        .collect::<Vec<_>>();
    debug!("Computed {formula} for {} row(s)", values.len());
    Outcome::Applied(ds.set_column(formula.column(), values))
}

/// Column positions resolved once per scoring pass.
struct Inputs {
    sales: Option<usize>,
    cv: Option<usize>,
    page_view: Option<usize>,
    avg_position: Option<usize>,
    click: Option<usize>,
    imp: Option<usize>,
}

impl Inputs {
    fn new(ds: &Dataset, metrics: &MetricColumns) -> Self {
        Inputs {
            sales: ds.column_index(&metrics.sales),
            cv: ds.column_index(&metrics.cv),
            page_view: ds.column_index(&metrics.page_view),
            avg_position: ds.column_index(&metrics.avg_position),
            click: ds.column_index(&metrics.click),
            imp: ds.column_index(&metrics.imp),
        }
    }

    fn present(&self, ds: &Dataset, row: usize, idx: Option<usize>) -> Option<f64> {
        ds.rows()[row][idx?].coerce_present()
    }
}
