//! Plain-text table rendering for record pages.
//!
//! Column widths are measured in terminal cells, so wide characters (CJK,
//! emoji) line up with ASCII ones.

use dashkit::record::Record;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a column may grow before its cells are truncated.
pub const MAX_COLUMN_WIDTH: usize = 32;

const GAP: &str = "  ";

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Field rendered in this column; also the header title.
    pub field: String,
    /// Width in terminal cells.
    pub width: usize,
}

/// A table sized to fit its header and cells.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table of `records` showing `fields` as columns.
    ///
    /// Missing fields render as empty cells.
    pub fn new<R: Record>(fields: &[String], records: &[R]) -> Self {
        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|record| {
                fields
                    .iter()
                    .map(|field| {
                        record
                            .field(field)
                            .map(|value| value.to_text().into_owned())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        let columns = fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let widest = rows
                    .iter()
                    .map(|row| row[i].width())
                    .chain(std::iter::once(field.width()))
                    .max()
                    .unwrap_or(0);
                Column {
                    field: field.clone(),
                    width: widest.min(MAX_COLUMN_WIDTH),
                }
            })
            .collect();

        Self { columns, rows }
    }

    /// Returns the columns.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the rendered cell text, row by row.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    fn headers_view(&self) -> String {
        let cells: Vec<String> = self.columns.iter().map(|c| c.field.to_uppercase()).collect();
        self.line(&cells)
    }

    fn line(&self, cells: &[String]) -> String {
        let line: Vec<String> = self
            .columns
            .iter()
            .zip(cells)
            .map(|(col, cell)| pad(&truncate(cell, col.width), col.width))
            .collect();
        line.join(GAP).trim_end().to_string()
    }

    /// Renders the header and every row, one line each.
    #[must_use]
    pub fn view(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(self.headers_view());
        lines.extend(self.rows.iter().map(|row| self.line(row)));
        lines.join("\n")
    }
}

/// Pads `s` with spaces to `width` cells.
fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(fill))
}

/// Truncates `s` to `width` cells, ending in an ellipsis when cut.
pub fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let budget = width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}
