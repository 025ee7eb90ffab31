// src/filter.rs

use crate::dates::SheetDate;
use crate::record::ShipmentRecord;
use serde::Deserialize;
use time::Date;
use tracing::debug;

/// Which date column a filter reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    Prealerta,
    Arribo,
    Liberacion,
}

impl DateField {
    pub fn read(self, record: &ShipmentRecord) -> Option<SheetDate> {
        match self {
            DateField::Prealerta => record.prealerta(),
            DateField::Arribo => record.arrival(),
            DateField::Liberacion => record.release(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

impl YearFilter {
    /// `"all"`, blank, or anything non-numeric means no year filter.
    pub fn parse(text: &str) -> Self {
        match text.trim().parse::<i32>() {
            Ok(year) => YearFilter::Year(year),
            Err(_) => YearFilter::All,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    /// Case-insensitive substring of the raw status text.
    Contains(String),
}

impl StatusFilter {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() || text.eq_ignore_ascii_case("all") {
            StatusFilter::All
        } else {
            StatusFilter::Contains(text.to_string())
        }
    }
}

/// Independent filter state for one view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    pub year: YearFilter,
    pub status: StatusFilter,
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    /// Column the year filter reads.
    pub year_field: DateField,
    /// Column the from/to bounds read.
    pub range_field: DateField,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self::new(DateField::Prealerta, DateField::Arribo)
    }
}

impl FilterSet {
    pub fn new(year_field: DateField, range_field: DateField) -> Self {
        Self {
            year: YearFilter::All,
            status: StatusFilter::All,
            date_from: None,
            date_to: None,
            year_field,
            range_field,
        }
    }

    /// Clear the criteria, keep the reference columns.
    pub fn reset(&mut self) {
        *self = Self::new(self.year_field, self.range_field);
    }

    pub fn has_range(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }

    /// A record without a date in `year_field` passes; one with an invalid
    /// date does not.
    pub fn matches_year(&self, record: &ShipmentRecord) -> bool {
        let YearFilter::Year(year) = self.year else {
            return true;
        };
        match self.year_field.read(record) {
            None => true,
            Some(date) => date.year() == Some(year),
        }
    }

    pub fn matches_status(&self, record: &ShipmentRecord) -> bool {
        match &self.status {
            StatusFilter::All => true,
            StatusFilter::Contains(needle) => record
                .status
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        }
    }

    /// With any bound set, a record needs a valid date in `range_field`.
    pub fn matches_range(&self, record: &ShipmentRecord) -> bool {
        if !self.has_range() {
            return true;
        }
        let Some(date) = self.range_field.read(record) else {
            return false;
        };
        self.date_from.is_none_or(|from| date.is_on_or_after(from))
            && self.date_to.is_none_or(|to| date.is_on_or_before(to))
    }

    pub fn matches(&self, record: &ShipmentRecord) -> bool {
        self.matches_year(record) && self.matches_status(record) && self.matches_range(record)
    }
}

/// Records passing every criterion of `filters`, in input order.
pub fn apply(records: &[ShipmentRecord], filters: &FilterSet) -> Vec<ShipmentRecord> {
    let kept: Vec<ShipmentRecord> = records
        .iter()
        .filter(|r| filters.matches(r))
        .cloned()
        .collect();
    debug!(input = records.len(), kept = kept.len(), filters = ?filters, "Filters applied");
    kept
}

/// Only the year criterion; the table view ignores status and range.
pub fn apply_year(records: &[ShipmentRecord], filters: &FilterSet) -> Vec<ShipmentRecord> {
    records
        .iter()
        .filter(|r| filters.matches_year(r))
        .cloned()
        .collect()
}
