// src/ingest.rs

use crate::error::FetchError;
use serde::Deserialize;

/// One row of cells, in source column order.
pub type Row = Vec<String>;

/// Split delimited text into rows of trimmed cells.
///
/// A `"` toggles quoted mode; the delimiter only ends a cell outside quotes.
/// Quote characters themselves are dropped. Escaped quotes inside a quoted
/// cell (`""`) are not recognised, so `"a ""b"""` comes out as `a b`.
/// Blank lines are skipped.
pub fn parse_delimited(text: &str, delimiter: char) -> Vec<Row> {
    let mut rows = Vec::new();

    for line in text.split('\n') {
        if line.trim().is_empty() {
            continue;
        }

        let mut row = Vec::new();
        let mut cell = String::new();
        let mut in_quotes = false;

        for ch in line.chars() {
            if ch == '"' {
                in_quotes = !in_quotes;
            } else if ch == delimiter && !in_quotes {
                row.push(cell.trim().to_string());
                cell.clear();
            } else {
                cell.push(ch);
            }
        }
        row.push(cell.trim().to_string());
        rows.push(row);
    }

    rows
}

/// Comma-separated export.
pub fn parse_csv(text: &str) -> Vec<Row> {
    parse_delimited(text, ',')
}

/// Body of a spreadsheet `values` response.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Decode a `{"values": [[...], ...]}` payload into rows.
///
/// The API omits trailing empty cells and may hand back numbers or booleans
/// for unformatted cells; everything is flattened to its string form.
pub fn parse_values_payload(body: &str) -> Result<Vec<Row>, FetchError> {
    let range: ValueRange =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    Ok(range
        .values
        .into_iter()
        .map(|row| row.into_iter().map(cell_to_string).collect())
        .collect())
}

fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
