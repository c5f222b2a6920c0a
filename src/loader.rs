//! Materialises a [`Dataset`] snapshot from the metrics export.
//!
//! [`load`] never fails: a missing, empty, undecodable, or malformed file
//! degrades to [`Dataset::empty`] so callers can treat "no data yet" as an
//! ordinary state. [`try_load`] exposes the underlying error for callers that
//! want to report it.

use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::{debug, warn};

use crate::{data::Value, dataset::Dataset, io_utils};

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
}

impl LoadOptions {
    pub fn for_path(path: &Path) -> Self {
        LoadOptions {
            delimiter: io_utils::resolve_input_delimiter(path, None),
            encoding: encoding_rs::UTF_8,
        }
    }
}

pub fn load(path: &Path, options: LoadOptions) -> Dataset {
    match try_load(path, options) {
        Ok(dataset) => dataset,
        Err(err) => {
            warn!("Treating {path:?} as empty: {err:#}");
            Dataset::empty()
        }
    }
}

pub fn try_load(path: &Path, options: LoadOptions) -> Result<Dataset> {
    let bytes = io_utils::read_input_bytes(path)?;
    let text = io_utils::decode_bytes(&bytes, options.encoding)
        .with_context(|| format!("Decoding {path:?}"))?;
    let dataset = parse_text(&text, options.delimiter)
        .with_context(|| format!("Parsing {path:?}"))?;
    debug!(
        "Loaded {} row(s) across {} column(s) from {:?}",
        dataset.row_count(),
        dataset.columns().len(),
        path
    );
    Ok(dataset)
}

/// Parses delimited text with a header row. Each column is typed as a whole:
/// numeric when every non-empty cell parses as a number, text otherwise.
pub fn parse_text(text: &str, delimiter: u8) -> Result<Dataset> {
    if text.trim().is_empty() {
        return Ok(Dataset::empty());
    }
    let mut reader = io_utils::open_csv_reader(text.as_bytes(), delimiter);
    let headers = reader
        .headers()
        .context("Reading header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect::<Vec<_>>();

    let mut raw_rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
        raw_rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    let numeric = (0..headers.len())
        .map(|col| {
            raw_rows.iter().all(|row| {
                let cell = row[col].trim();
                cell.is_empty() || Value::from_raw(cell).is_number()
            })
        })
        .collect::<Vec<_>>();

    let rows = raw_rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .enumerate()
                .map(|(col, cell)| {
                    if cell.trim().is_empty() {
                        Value::Missing
                    } else if numeric[col] {
                        Value::from_raw(&cell)
                    } else {
                        Value::Text(cell)
                    }
                })
                .collect()
        })
        .collect();

    Ok(Dataset::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_column_stays_text() {
        let ds = parse_text("id,page_view\n1,10\n2,abc\n", b',').unwrap();
        assert_eq!(ds.value(0, "id"), Some(&Value::Number(1.0)));
        assert_eq!(ds.value(0, "page_view"), Some(&Value::Text("10".into())));
    }

    #[test]
    fn empty_cells_are_missing() {
        let ds = parse_text("id,cv\n1,\n2,3\n", b',').unwrap();
        assert_eq!(ds.value(0, "cv"), Some(&Value::Missing));
        assert_eq!(ds.value(1, "cv"), Some(&Value::Number(3.0)));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(parse_text("a,b\n1,2,3\n", b',').is_err());
    }

    #[test]
    fn header_only_has_columns_and_no_rows() {
        let ds = parse_text("a,b\n", b',').unwrap();
        assert_eq!(ds.columns(), ["a", "b"]);
        assert_eq!(ds.row_count(), 0);
        assert!(!ds.is_empty());
    }

    #[test]
    fn missing_file_degrades_to_empty() {
        let path = Path::new("definitely/not/here.csv");
        let ds = load(path, LoadOptions::for_path(path));
        assert!(ds.is_empty());
    }
}
