//! Column roles and engine settings.
//!
//! A [`Profile`] names the columns each stage works with. The defaults match
//! the metrics export produced by the upstream collection job; operators can
//! dump them with `article-triage profile` and load an edited copy with
//! `--profile`.

use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const SHADOW_SUFFIX: &str = "_numeric";

/// Subtraction order for the ranking delta column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankDeltaConvention {
    /// `7-day − 30-day`
    #[default]
    SevenMinusThirty,
    /// `30-day − 7-day`
    ThirtyMinusSeven,
}

impl RankDeltaConvention {
    pub fn delta(self, seven_day: f64, thirty_day: f64) -> f64 {
        match self {
            RankDeltaConvention::SevenMinusThirty => seven_day - thirty_day,
            RankDeltaConvention::ThirtyMinusSeven => thirty_day - seven_day,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingColumns {
    pub thirty_day: String,
    pub seven_day: String,
    pub delta: String,
    pub convention: RankDeltaConvention,
}

impl Default for RankingColumns {
    fn default() -> Self {
        RankingColumns {
            thirty_day: "30日間平均順位".to_string(),
            seven_day: "7日間平均順位".to_string(),
            delta: "順位差".to_string(),
            convention: RankDeltaConvention::default(),
        }
    }
}

/// Input columns read by the scoring formulas and the threshold filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricColumns {
    pub sales: String,
    pub cv: String,
    pub page_view: String,
    /// Blank cells stay missing through normalisation.
    pub avg_position: String,
    pub click: String,
    pub imp: String,
}

impl Default for MetricColumns {
    fn default() -> Self {
        MetricColumns {
            sales: "sales".to_string(),
            cv: "cv".to_string(),
            page_view: "page_view".to_string(),
            avg_position: "avg_position".to_string(),
            click: "click".to_string(),
            imp: "imp".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub numeric_columns: Vec<String>,
    pub deprecated_columns: Vec<String>,
    pub pivot_column: String,
    pub new_columns: Vec<String>,
    pub ranking: RankingColumns,
    pub metrics: MetricColumns,
    pub title_columns: Vec<String>,
    pub id_columns: Vec<String>,
    pub category_column: String,
    pub all_categories: Vec<String>,
    pub nonzero_columns: Vec<String>,
    pub url_column: String,
    pub cell_width: usize,
}

impl Default for Profile {
    fn default() -> Self {
        let ranking = RankingColumns::default();
        let strings = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let mut numeric_columns = strings(&[
            "session",
            "page_view",
            "click_app_store",
            "imp",
            "click",
            "sum_position",
            "avg_position",
            "sales",
            "app_link_click",
            "cv",
        ]);
        numeric_columns.push(ranking.thirty_day.clone());
        numeric_columns.push(ranking.seven_day.clone());
        let new_columns = vec![
            ranking.thirty_day.clone(),
            ranking.seven_day.clone(),
            ranking.delta.clone(),
        ];
        Profile {
            numeric_columns,
            deprecated_columns: strings(&["split_categories"]),
            pivot_column: "post_title".to_string(),
            new_columns,
            ranking,
            metrics: MetricColumns::default(),
            title_columns: strings(&["title", "post_title"]),
            id_columns: strings(&["POST_ID", "id"]),
            category_column: "category".to_string(),
            all_categories: strings(&["all", "すべて"]),
            nonzero_columns: strings(&["sales", "cv"]),
            url_column: "URL".to_string(),
            cell_width: 40,
        }
    }
}

impl Profile {
    pub fn load(path: &Path) -> Result<Self> {
        let mut raw = String::new();
        File::open(path)
            .with_context(|| format!("Opening profile {path:?}"))?
            .read_to_string(&mut raw)
            .with_context(|| format!("Reading profile {path:?}"))?;
        serde_yaml::from_str(&raw).with_context(|| format!("Parsing profile {path:?}"))
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Profile::load(path),
            None => Ok(Profile::default()),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Serializing profile")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = self.to_yaml()?;
        let mut file =
            File::create(path).with_context(|| format!("Creating profile {path:?}"))?;
        file.write_all(serialized.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    pub fn is_all_categories(&self, selection: &str) -> bool {
        let selection = selection.trim();
        selection.is_empty() || self.all_categories.iter().any(|s| s == selection)
    }

    /// Name of the untouched numeric copy of the page_view column.
    pub fn page_view_shadow(&self) -> String {
        format!("{}{SHADOW_SUFFIX}", self.metrics.page_view)
    }
}
