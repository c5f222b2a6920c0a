//! Terminal stage: turns the final dataset into display-safe strings.
//!
//! Rendering is one-way. It reads the dataset and never feeds anything back
//! into filtering, scoring, or sorting.

use std::fmt::Write as _;

use serde::Serialize;

use crate::{dataset::Dataset, profile::Profile};

pub const TABLE_CLASS: &str = "customtable";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub url_column: String,
    /// Cells longer than this many characters are wrapped in a scrollable,
    /// truncating container. Zero disables wrapping.
    pub cell_width: usize,
}

impl RenderOptions {
    pub fn from_profile(profile: &Profile) -> Self {
        RenderOptions {
            url_column: profile.url_column.clone(),
            cell_width: profile.cell_width,
        }
    }
}

pub fn render(ds: &Dataset, options: &RenderOptions) -> DisplayTable {
    let url_idx = ds.column_index(&options.url_column);
    let headers = ds.columns().iter().map(|h| escape_html(h)).collect();
    let rows = ds
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(idx, value)| {
                    let text = value.as_display();
                    if Some(idx) == url_idx && text.starts_with("http") {
                        link(&text)
                    } else {
                        wrap(escape_html(&text), &text, options.cell_width)
                    }
                })
                .collect()
        })
        .collect();
    DisplayTable { headers, rows }
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn link(url: &str) -> String {
    let escaped = escape_html(url);
    format!(
        r#"<div style="text-align: right"><a href="{escaped}" target="_blank" rel="noopener">{escaped}</a></div>"#
    )
}

fn wrap(escaped: String, raw: &str, width: usize) -> String {
    if width == 0 || raw.chars().count() <= width {
        return escaped;
    }
    format!(r#"<div class="cell" title="{escaped}">{escaped}</div>"#)
}

/// Serialises a display table as an HTML `<table>`; cells are inserted as-is
/// because [`render`] already escaped them.
pub fn to_html(table: &DisplayTable) -> String {
    let mut html = String::new();
    let _ = writeln!(html, r#"<table class="{TABLE_CLASS}">"#);
    let _ = writeln!(html, "  <thead>");
    let _ = write!(html, "    <tr>");
    for header in &table.headers {
        let _ = write!(html, "<th>{header}</th>");
    }
    let _ = writeln!(html, "</tr>");
    let _ = writeln!(html, "  </thead>");
    let _ = writeln!(html, "  <tbody>");
    for row in &table.rows {
        let _ = write!(html, "    <tr>");
        for cell in row {
            let _ = write!(html, "<td>{cell}</td>");
        }
        let _ = writeln!(html, "</tr>");
    }
    let _ = writeln!(html, "  </tbody>");
    let _ = writeln!(html, "</table>");
    html
}
