// src/record.rs

use crate::columns::{ColumnMap, Field};
use crate::dates::{self, SheetDate};
use crate::ingest::Row;
use crate::status::{self, StatusCategory};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::{info, warn};

pub const DEFAULT_STATUS: &str = "Pending";

static LEADING_NUMBER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+))").ok());

/// One shipment row. Every field is a string; empty when the sheet has no
/// such column or the cell is blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShipmentRecord {
    pub mawb_first_leg: String,
    pub mawb_second_leg: String,
    pub status: String,
    pub review_start_date: String,
    pub review_end_date: String,
    pub time_to_complete: String,
    pub prealerta_date: String,
    pub arrival_date: String,
    pub release_date: String,
    pub released_quantity: String,
    pub reference: String,
    pub comments: String,
}

impl ShipmentRecord {
    pub fn category(&self) -> StatusCategory {
        status::classify(&self.status)
    }

    pub fn prealerta(&self) -> Option<SheetDate> {
        dates::parse_date(&self.prealerta_date)
    }

    pub fn arrival(&self) -> Option<SheetDate> {
        dates::parse_date(&self.arrival_date)
    }

    pub fn release(&self) -> Option<SheetDate> {
        dates::parse_date(&self.release_date)
    }

    /// Released packages as a number. Accepts a comma decimal separator and
    /// ignores trailing text; anything unparseable counts as zero.
    pub fn released_quantity_value(&self) -> f64 {
        leading_number(&self.released_quantity.replacen(',', ".", 1)).unwrap_or(0.0)
    }
}

fn leading_number(text: &str) -> Option<f64> {
    let re = LEADING_NUMBER.as_ref()?;
    re.captures(text).and_then(|c| c[1].parse::<f64>().ok())
}

fn cell(row: &Row, column: Option<usize>) -> Option<&str> {
    column.and_then(|i| row.get(i)).map(String::as_str)
}

fn text_field(row: &Row, columns: &ColumnMap, field: Field) -> String {
    cell(row, columns.get(field)).unwrap_or_default().to_string()
}

/// Build one record, or `None` when the first-leg identifier is missing.
pub fn normalize_row(row: &Row, columns: &ColumnMap) -> Option<ShipmentRecord> {
    let first_leg = cell(row, columns.mawb_first_leg)?;
    if first_leg.trim().is_empty() {
        return None;
    }

    let status = match cell(row, columns.status) {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => DEFAULT_STATUS.to_string(),
    };

    Some(ShipmentRecord {
        mawb_first_leg: first_leg.to_string(),
        mawb_second_leg: text_field(row, columns, Field::MawbSecondLeg),
        status,
        review_start_date: text_field(row, columns, Field::ReviewStart),
        review_end_date: text_field(row, columns, Field::ReviewEnd),
        time_to_complete: text_field(row, columns, Field::TimeToComplete),
        prealerta_date: text_field(row, columns, Field::Prealerta),
        arrival_date: text_field(row, columns, Field::Arribo),
        release_date: text_field(row, columns, Field::Liberacion),
        released_quantity: text_field(row, columns, Field::ReleasedQuantity),
        reference: text_field(row, columns, Field::Reference),
        comments: text_field(row, columns, Field::Comments),
    })
}

/// Turn a header row plus data rows into shipment records.
///
/// The first row is the header. Rows without a first-leg identifier are
/// dropped silently.
pub fn parse_records(rows: &[Row]) -> Vec<ShipmentRecord> {
    let Some((header, data)) = rows.split_first() else {
        warn!("No rows in sheet");
        return Vec::new();
    };

    let columns = ColumnMap::resolve(header);
    if columns.mawb_first_leg.is_none() {
        warn!("No first-leg column found; every row will be skipped");
    }

    let records: Vec<ShipmentRecord> = data
        .iter()
        .filter_map(|row| normalize_row(row, &columns))
        .collect();

    info!(
        loaded = records.len(),
        skipped = data.len() - records.len(),
        "Shipment records loaded"
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Row> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn example_sheet_yields_two_records() {
        let records = parse_records(&rows(&[
            &["MAWB1", "MAWB2", "Status", "Start", "End"],
            &["123", "456", "In Review", "01/01/2024", "02/01/2024"],
            &["789", "", "Pending", "", ""],
        ]));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].mawb_first_leg, "123");
        assert_eq!(records[0].mawb_second_leg, "456");
        assert_eq!(records[0].status, "In Review");
        assert_eq!(records[1].mawb_second_leg, "");
    }

    #[test]
    fn rows_without_first_leg_are_dropped() {
        let records = parse_records(&rows(&[
            &["MAWB First Leg", "Status"],
            &["", "Released"],
            &["   ", "Released"],
            &[],
            &["A1", "Released"],
        ]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].mawb_first_leg, "A1");
    }

    #[test]
    fn missing_first_leg_column_drops_everything() {
        let records = parse_records(&rows(&[&["Status"], &["Released"]]));
        assert!(records.is_empty());
    }

    #[test]
    fn status_defaults_to_pending() {
        let no_column = parse_records(&rows(&[&["First Leg"], &["A"]]));
        assert_eq!(no_column[0].status, DEFAULT_STATUS);

        let blank_cell = parse_records(&rows(&[&["First Leg", "Status"], &["A", " "]]));
        assert_eq!(blank_cell[0].status, DEFAULT_STATUS);

        let short_row = parse_records(&rows(&[&["First Leg", "Comment", "Status"], &["A"]]));
        assert_eq!(short_row[0].status, DEFAULT_STATUS);
        assert_eq!(short_row[0].comments, "");
    }

    #[test]
    fn extended_columns_are_mapped() {
        let records = parse_records(&rows(&[
            &[
                "MAWB First Leg",
                "Fecha Prealerta",
                "Fecha Arribo",
                "Fecha Liberación",
                "PQ Liberados",
                "Referencias",
                "Comentarios",
            ],
            &["A", "01/02/2024", "03/02/2024", "10/02/2024", "1,5", "REF-1", "ok"],
        ]));
        let r = &records[0];
        assert_eq!(r.prealerta_date, "01/02/2024");
        assert_eq!(r.arrival_date, "03/02/2024");
        assert_eq!(r.release_date, "10/02/2024");
        assert_eq!(r.reference, "REF-1");
        assert_eq!(r.comments, "ok");
        assert_eq!(r.released_quantity_value(), 1.5);
    }

    #[test]
    fn quantity_pattern_compiles_once() {
        assert!(LEADING_NUMBER.is_some());
        assert_eq!(leading_number(" .5 pcs"), Some(0.5));
    }

    #[test]
    fn released_quantity_is_lenient() {
        let mut r = ShipmentRecord::default();
        for (raw, want) in [("12", 12.0), ("3.25", 3.25), ("7 pkgs", 7.0), ("", 0.0), ("n/a", 0.0)] {
            r.released_quantity = raw.to_string();
            assert_eq!(r.released_quantity_value(), want, "{raw}");
        }
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(parse_records(&[]).is_empty());
    }
}
