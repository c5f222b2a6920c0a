//! The in-memory tabular snapshot shared by every pipeline stage.
//!
//! A [`Dataset`] holds ordered, uniquely named columns and rows whose cells are
//! aligned with those columns by position. Columns are addressed by name.
//! Stages take the dataset by value and hand back the transformed value.

use serde::Serialize;

use crate::data::Value;

pub type Row = Vec<Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Builds a dataset, padding or truncating rows to the column count and
    /// suffixing duplicate column names with `.1`, `.2`, ...
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let columns = dedupe_column_names(columns);
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Missing);
                row
            })
            .collect();
        Dataset { columns, rows }
    }

    pub fn empty() -> Self {
        Dataset::default()
    }

    /// Convenience constructor from raw string cells, as read from CSV.
    pub fn from_raw_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|cell| Value::from_raw(cell)).collect())
            .collect();
        Dataset::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// First of `candidates` that exists in the dataset.
    pub fn first_present<'a>(&self, candidates: &'a [String]) -> Option<&'a str> {
        candidates
            .iter()
            .map(String::as_str)
            .find(|name| self.has_column(name))
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    pub fn column_values<'a>(
        &'a self,
        name: &str,
    ) -> Option<impl Iterator<Item = &'a Value> + use<'a>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// True when every present cell of the column is numeric.
    pub fn is_numeric_column(&self, name: &str) -> bool {
        match self.column_values(name) {
            Some(mut values) => values.all(|v| v.is_number() || v.is_missing()),
            None => false,
        }
    }

    pub fn drop_column(mut self, name: &str) -> Self {
        if let Some(idx) = self.column_index(name) {
            self.columns.remove(idx);
            for row in &mut self.rows {
                row.remove(idx);
            }
        }
        self
    }

    /// Writes `values` into column `name`, replacing an existing column in
    /// place or appending a new one at the end.
    pub fn set_column(mut self, name: &str, values: Vec<Value>) -> Self {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        self
    }

    /// Rewrites every cell of an existing column; no-op when absent.
    pub fn map_column<F>(mut self, name: &str, mut f: F) -> Self
    where
        F: FnMut(&Value) -> Value,
    {
        if let Some(idx) = self.column_index(name) {
            for row in &mut self.rows {
                row[idx] = f(&row[idx]);
            }
        }
        self
    }

    /// Keeps the rows for which `predicate` holds, preserving their order.
    pub fn retain_rows<F>(mut self, mut predicate: F) -> Self
    where
        F: FnMut(&Dataset, &Row) -> bool,
    {
        let rows = std::mem::take(&mut self.rows);
        let kept = rows
            .into_iter()
            .filter(|row| predicate(&self, row))
            .collect();
        self.rows = kept;
        self
    }

    /// Moves the listed columns, in the given order, to sit immediately after
    /// `pivot`. Names that are absent, or equal to the pivot, are skipped.
    pub fn move_columns_after(mut self, pivot: &str, names: &[String]) -> Self {
        if !self.has_column(pivot) {
            return self;
        }
        let mut moving = Vec::new();
        for name in names {
            if name == pivot || moving.contains(&name.as_str()) {
                continue;
            }
            if self.has_column(name) {
                moving.push(name.as_str());
            }
        }
        if moving.is_empty() {
            return self;
        }

        let mut order: Vec<usize> = (0..self.columns.len())
            .filter(|idx| !moving.contains(&self.columns[*idx].as_str()))
            .collect();
        let pivot_pos = order
            .iter()
            .position(|idx| self.columns[*idx] == pivot)
            .map(|pos| pos + 1)
            .unwrap_or(order.len());
        let inserted = moving
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect::<Vec<_>>();
        order.splice(pivot_pos..pivot_pos, inserted);

        self.columns = order.iter().map(|idx| self.columns[*idx].clone()).collect();
        self.rows = self
            .rows
            .into_iter()
            .map(|row| order.iter().map(|idx| row[*idx].clone()).collect())
            .collect();
        self
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn truncate(mut self, limit: usize) -> Self {
        self.rows.truncate(limit);
        self
    }
}

fn dedupe_column_names(columns: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(columns.len());
    for name in columns {
        if !seen.contains(&name) {
            seen.push(name);
            continue;
        }
        let mut suffix = 1usize;
        loop {
            let candidate = format!("{name}.{suffix}");
            if !seen.contains(&candidate) {
                seen.push(candidate);
                break;
            }
            suffix += 1;
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_raw_rows(
            vec!["a".into(), "post_title".into(), "b".into(), "c".into()],
            vec![
                vec!["1".into(), "t1".into(), "x".into(), "9".into()],
                vec!["2".into(), "t2".into(), "y".into(), "8".into()],
            ],
        )
    }

    #[test]
    fn duplicate_headers_get_suffixes() {
        let ds = Dataset::new(vec!["x".into(), "x".into(), "x".into()], Vec::new());
        assert_eq!(ds.columns(), ["x", "x.1", "x.2"]);
    }

    #[test]
    fn short_rows_are_padded_with_missing() {
        let ds = Dataset::new(vec!["a".into(), "b".into()], vec![vec![Value::Number(1.0)]]);
        assert_eq!(ds.value(0, "b"), Some(&Value::Missing));
    }

    #[test]
    fn move_columns_after_pivot_is_stable() {
        let ds = sample().move_columns_after(
            "post_title",
            &["c".into(), "missing".into(), "b".into()],
        );
        assert_eq!(ds.columns(), ["a", "post_title", "c", "b"]);
        assert_eq!(ds.value(0, "c"), Some(&Value::Number(9.0)));
        assert_eq!(ds.value(1, "b"), Some(&Value::Text("y".into())));

        let again = ds.clone().move_columns_after("post_title", &["c".into(), "b".into()]);
        assert_eq!(again, ds);
    }

    #[test]
    fn move_columns_without_pivot_is_noop() {
        let ds = sample();
        let moved = ds.clone().move_columns_after("nope", &["c".into()]);
        assert_eq!(moved, ds);
    }

    #[test]
    fn set_column_replaces_in_place() {
        let ds = sample().set_column("b", vec![Value::Number(1.0), Value::Number(2.0)]);
        assert_eq!(ds.columns(), ["a", "post_title", "b", "c"]);
        assert_eq!(ds.value(1, "b"), Some(&Value::Number(2.0)));

        let ds = ds.set_column("d", vec![Value::Missing, Value::Missing]);
        assert_eq!(ds.columns().last().map(String::as_str), Some("d"));
    }

    #[test]
    fn drop_column_absent_is_noop() {
        let ds = sample();
        assert_eq!(ds.clone().drop_column("zzz"), ds);
        assert_eq!(ds.drop_column("b").columns(), ["a", "post_title", "c"]);
    }
}
