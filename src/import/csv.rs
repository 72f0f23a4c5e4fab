//! Comma-separated member files: parsing uploads, building downloads.
//!
//! Parsing is a plain split on `\n` and `,`; quoted fields are not
//! understood, so a value containing a comma shifts every later column.

use std::collections::HashMap;

use super::RowFailure;

/// Column order of the downloadable template.
pub const TEMPLATE_HEADER: &str = "full_name,email,country,troop_type,rank_name";
pub const FAILURES_HEADER: &str = "email,error";

/// One data line, keyed by header name.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    /// 1-based position among the data lines (header excluded).
    pub line: usize,
    fields: HashMap<String, String>,
}

impl CsvRow {
    /// Trimmed value of `column`, or `""` when the line was too short or the
    /// column does not exist.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
}

fn split_trimmed(line: &str) -> Vec<String> {
    line.split(',').map(|v| v.trim().to_owned()).collect()
}

/// Parse an uploaded file. The first line names the columns; each later line
/// is paired with them by position. Blank lines come through as rows with
/// only empty values.
pub fn parse(text: &str) -> CsvTable {
    let text = text.trim();
    if text.is_empty() {
        return CsvTable::default();
    }

    let mut lines = text.split('\n');
    let headers = lines.next().map(split_trimmed).unwrap_or_default();

    let rows = lines
        .enumerate()
        .map(|(i, line)| {
            let values = split_trimmed(line);
            let mut fields = HashMap::with_capacity(headers.len());
            for (h, v) in headers.iter().zip(values) {
                fields.insert(h.clone(), v);
            }
            CsvRow { line: i + 1, fields }
        })
        .collect();

    CsvTable { headers, rows }
}

/// Template offered for download, with two sample members.
pub fn template() -> String {
    format!(
        "{TEMPLATE_HEADER}\n\
         John Doe,john@example.com,USA,Infantry,Elite\n\
         Alice Smith,alice@example.com,UK,Rider,Commander"
    )
}

/// Failed rows as a download. Commas in messages become `;` so each line keeps
/// exactly two columns.
pub fn failures_csv(failures: &[RowFailure]) -> String {
    let mut out = String::from(FAILURES_HEADER);
    out.push('\n');
    let lines: Vec<String> = failures
        .iter()
        .map(|f| format!("{},{}", f.email, f.error.replace(',', ";")))
        .collect();
    out.push_str(&lines.join("\n"));
    out
}
