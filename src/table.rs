//! Plain-text table for terminal output.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::dataset::Dataset;

/// Renders the dataset's display values as aligned columns, truncating cells
/// wider than `max_width` characters (zero means unlimited).
pub fn render_dataset(ds: &Dataset, max_width: usize) -> String {
    let rows = ds
        .rows()
        .iter()
        .map(|row| row.iter().map(|v| v.as_display()).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    render_table(ds.columns(), &rows, max_width)
}

pub fn render_table(headers: &[String], rows: &[Vec<String>], max_width: usize) -> String {
    let clip = |value: &str| -> String { truncate(&sanitize_cell(value), max_width) };
    let headers = headers.iter().map(|h| clip(h.as_str())).collect::<Vec<_>>();
    let rows = rows
        .iter()
        .map(|row| row.iter().map(|cell| clip(cell.as_str())).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in &rows {
        for (idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }
    for width in &mut widths {
        *width = (*width).max(3);
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(&headers, &widths));
    let separator = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator, &widths));
    for row in &rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let padding = width.saturating_sub(value.chars().count());
            format!("{value}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

fn truncate(value: &str, max_width: usize) -> String {
    if max_width == 0 || value.chars().count() <= max_width {
        return value.to_string();
    }
    let mut clipped = value.chars().take(max_width.saturating_sub(1)).collect::<String>();
    clipped.push('…');
    clipped
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligns_columns_with_minimum_width() {
        let headers = vec!["id".to_string(), "title".to_string()];
        let rows = vec![
            vec!["1".to_string(), "Alpha".to_string()],
            vec!["22".to_string(), "Be".to_string()],
        ];
        let rendered = render_table(&headers, &rows, 0);
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines, ["id   title", "---  -----", "1    Alpha", "22   Be"]);
    }

    #[test]
    fn truncates_long_cells_and_flattens_control_chars() {
        let headers = vec!["note".to_string()];
        let rows = vec![vec!["line1\nline2 and more".to_string()]];
        let rendered = render_table(&headers, &rows, 8);
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[2], "line1 l…");
    }

    #[test]
    fn counts_multibyte_characters_as_single_columns() {
        let headers = vec!["順位差".to_string(), "x".to_string()];
        let rows = vec![vec!["1.5".to_string(), "y".to_string()]];
        let rendered = render_table(&headers, &rows, 0);
        assert_eq!(rendered.lines().next(), Some("順位差  x"));
    }
}
