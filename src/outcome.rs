use std::fmt;

use crate::dataset::Dataset;

/// Result of a filter or scoring call.
///
/// `Unavailable` is distinct from a filter that matched zero rows: the
/// operation could not run because required columns are absent, and the
/// dataset is handed back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Applied(Dataset),
    Unavailable { dataset: Dataset, missing: Vec<String> },
}

impl Outcome {
    pub fn unavailable(dataset: Dataset, missing: Vec<String>) -> Self {
        Outcome::Unavailable { dataset, missing }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn dataset(&self) -> &Dataset {
        match self {
            Outcome::Applied(dataset) | Outcome::Unavailable { dataset, .. } => dataset,
        }
    }

    pub fn into_dataset(self) -> Dataset {
        match self {
            Outcome::Applied(dataset) | Outcome::Unavailable { dataset, .. } => dataset,
        }
    }

    pub fn missing_columns(&self) -> &[String] {
        match self {
            Outcome::Applied(_) => &[],
            Outcome::Unavailable { missing, .. } => missing,
        }
    }
}

/// Operator-facing summary of one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Applied { before: usize, after: usize },
    Unavailable { reason: String },
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Applied { before, after } if before == after => {
                write!(f, "{after} row(s)")
            }
            Feedback::Applied { before, after } => write!(f, "{before} -> {after} row(s)"),
            Feedback::Unavailable { reason } => write!(f, "unavailable: {reason}"),
        }
    }
}
