// src/trend.rs

use crate::record::ShipmentRecord;
use serde::Serialize;
use std::collections::BTreeSet;

pub const MONTH_LABELS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

/// Released quantity per month of one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySeries {
    pub year: i32,
    pub labels: [&'static str; 12],
    pub values: [f64; 12],
}

impl MonthlySeries {
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Sum released quantities into month buckets by release date, for `year`.
/// Records without a valid release date in that year are left out.
pub fn monthly_released(records: &[ShipmentRecord], year: i32) -> MonthlySeries {
    let mut values = [0.0; 12];

    for record in records {
        let Some(release) = record.release() else {
            continue;
        };
        if release.year() != Some(year) {
            continue;
        }
        if let Some(month) = release.month_index() {
            values[month] += record.released_quantity_value();
        }
    }

    MonthlySeries {
        year,
        labels: MONTH_LABELS,
        values,
    }
}

/// Distinct years present among valid release dates, ascending.
pub fn release_years(records: &[ShipmentRecord]) -> BTreeSet<i32> {
    records
        .iter()
        .filter_map(|r| r.release().and_then(|d| d.year()))
        .collect()
}

/// Latest year with releases, or `fallback` when there are none.
pub fn default_year(records: &[ShipmentRecord], fallback: i32) -> i32 {
    release_years(records).last().copied().unwrap_or(fallback)
}
