//! Operator actions and the session that applies them.
//!
//! An [`Action`] is one discrete operator request. [`Session::apply`] runs it
//! against the current snapshot and reports [`Feedback`]; an action that
//! cannot run leaves the snapshot untouched and says why. Actions are parsed
//! from short strings such as `title=rust`, `threshold=1,100`, or
//! `rewrite-priority`.

use std::str::FromStr;

use log::{info, warn};
use thiserror::Error;

use crate::{
    dataset::Dataset,
    filter::{self, CategorySelection, MatchCase, Threshold},
    outcome::{Feedback, Outcome},
    profile::Profile,
    score::{self, Formula},
    sort,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionParseError {
    #[error("empty action")]
    Empty,
    #[error("unknown action '{0}'")]
    Unknown(String),
    #[error("action '{action}' expects {expected}")]
    BadArgument {
        action: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SearchTitle(String),
    SearchId(String),
    FilterCategory(String),
    FilterNonZero,
    Threshold { min_cv: f64, min_page_view: f64 },
    Score(Formula),
    Sort(String),
}

impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ActionParseError::Empty);
        }
        let (name, argument) = match trimmed.split_once('=') {
            Some((name, argument)) => (name.trim(), Some(argument)),
            None => (trimmed, None),
        };
        let bad = |expected: &'static str| ActionParseError::BadArgument {
            action: name.to_string(),
            expected,
        };
        match (name.to_ascii_lowercase().as_str(), argument) {
            ("title", Some(query)) => Ok(Action::SearchTitle(query.to_string())),
            ("id", Some(query)) => Ok(Action::SearchId(query.to_string())),
            ("category", Some(category)) => Ok(Action::FilterCategory(category.trim().to_string())),
            ("nonzero", None) => Ok(Action::FilterNonZero),
            ("threshold", Some(argument)) => {
                let (cv, page_view) = argument
                    .split_once(',')
                    .ok_or_else(|| bad("'<min_cv>,<min_page_view>'"))?;
                let min_cv = cv.trim().parse().map_err(|_| bad("a numeric minimum cv"))?;
                let min_page_view = page_view
                    .trim()
                    .parse()
                    .map_err(|_| bad("a numeric minimum page_view"))?;
                Ok(Action::Threshold {
                    min_cv,
                    min_page_view,
                })
            }
            ("sort", Some(column)) if !column.trim().is_empty() => {
                Ok(Action::Sort(column.trim().to_string()))
            }
            ("sort", _) => Err(bad("a column name")),
            ("title" | "id" | "category" | "threshold", None) => Err(bad("an '=' argument")),
            (other, None) => other
                .parse::<Formula>()
                .map(Action::Score)
                .map_err(|_| ActionParseError::Unknown(trimmed.to_string())),
            (_, Some(_)) => Err(ActionParseError::Unknown(trimmed.to_string())),
        }
    }
}

pub fn parse_actions(raw: &[String]) -> Result<Vec<Action>, ActionParseError> {
    raw.iter().map(|action| action.parse()).collect()
}

/// Holds the single snapshot an operator is working on.
#[derive(Debug)]
pub struct Session<'a> {
    dataset: Dataset,
    profile: &'a Profile,
    case: MatchCase,
}

impl<'a> Session<'a> {
    pub fn new(dataset: Dataset, profile: &'a Profile) -> Self {
        Session {
            dataset,
            profile,
            case: MatchCase::default(),
        }
    }

    pub fn with_match_case(mut self, case: MatchCase) -> Self {
        self.case = case;
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    pub fn apply(&mut self, action: &Action) -> Feedback {
        let before = self.dataset.row_count();
        let current = std::mem::take(&mut self.dataset);
        let (dataset, feedback) = self.run(current, action);
        self.dataset = dataset;
        let feedback = feedback.unwrap_or(Feedback::Applied {
            before,
            after: self.dataset.row_count(),
        });
        match &feedback {
            Feedback::Applied { .. } => info!("{action:?}: {feedback}"),
            Feedback::Unavailable { .. } => warn!("{action:?}: {feedback}"),
        }
        feedback
    }

    pub fn apply_all(&mut self, actions: &[Action]) -> Vec<Feedback> {
        actions.iter().map(|action| self.apply(action)).collect()
    }

    /// Returns the next snapshot plus feedback when the action did not apply.
    fn run(&self, ds: Dataset, action: &Action) -> (Dataset, Option<Feedback>) {
        let profile = self.profile;
        match action {
            Action::SearchTitle(query) => {
                settle(filter::substring(ds, &profile.title_columns, query, self.case))
            }
            Action::SearchId(query) => {
                settle(filter::substring(ds, &profile.id_columns, query, self.case))
            }
            Action::FilterCategory(name) => {
                let selection = if profile.is_all_categories(name) {
                    CategorySelection::All
                } else {
                    CategorySelection::Only(name.clone())
                };
                settle(filter::category(ds, &profile.category_column, &selection))
            }
            Action::FilterNonZero => settle(filter::nonzero(ds, &profile.nonzero_columns)),
            Action::Threshold {
                min_cv,
                min_page_view,
            } => settle(filter::threshold(
                ds,
                &[
                    Threshold::new(&profile.metrics.cv, *min_cv),
                    Threshold::new(&profile.metrics.page_view, *min_page_view),
                ],
            )),
            Action::Score(formula) => match score::score(ds, *formula, &profile.metrics) {
                Outcome::Applied(ds) if formula.sorts_after_compute() => {
                    sort_or_report(ds, formula.column())
                }
                outcome => settle(outcome),
            },
            Action::Sort(column) => sort_or_report(ds, column),
        }
    }
}

fn settle(outcome: Outcome) -> (Dataset, Option<Feedback>) {
    match outcome {
        Outcome::Applied(ds) => (ds, None),
        Outcome::Unavailable { dataset, missing } => (
            dataset,
            Some(Feedback::Unavailable {
                reason: format!("missing column(s): {}", missing.join(", ")),
            }),
        ),
    }
}

fn sort_or_report(mut ds: Dataset, column: &str) -> (Dataset, Option<Feedback>) {
    match sort::sort_rows_descending(&mut ds, column) {
        Ok(()) => (ds, None),
        Err(err) => (
            ds,
            Some(Feedback::Unavailable {
                reason: err.to_string(),
            }),
        ),
    }
}
