// src/stats.rs

use crate::record::ShipmentRecord;
use crate::status::StatusCategory;
use serde::Serialize;

/// Counts per named category. `total` includes Unclassified records, which
/// have no bucket of their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub review: usize,
    pub pending: usize,
    pub transmissions: usize,
    pub inspection: usize,
    pub released: usize,
    pub total: usize,
}

impl StatsSnapshot {
    pub fn count(&self, category: StatusCategory) -> usize {
        match category {
            StatusCategory::Review => self.review,
            StatusCategory::Pending => self.pending,
            StatusCategory::Transmissions => self.transmissions,
            StatusCategory::Inspection => self.inspection,
            StatusCategory::Released => self.released,
            StatusCategory::Unclassified => self.total.saturating_sub(self.named_total()),
        }
    }

    /// Share of `total`, rounded half away from zero; 0 when there is nothing.
    pub fn percent(&self, category: StatusCategory) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.count(category) as f64 / self.total as f64 * 100.0).round() as u32
    }

    pub fn review_percent(&self) -> u32 {
        self.percent(StatusCategory::Review)
    }

    pub fn pending_percent(&self) -> u32 {
        self.percent(StatusCategory::Pending)
    }

    pub fn transmissions_percent(&self) -> u32 {
        self.percent(StatusCategory::Transmissions)
    }

    pub fn inspection_percent(&self) -> u32 {
        self.percent(StatusCategory::Inspection)
    }

    pub fn released_percent(&self) -> u32 {
        self.percent(StatusCategory::Released)
    }

    /// Records that landed in one of the five named buckets.
    pub fn named_total(&self) -> usize {
        self.review + self.pending + self.transmissions + self.inspection + self.released
    }

    fn bump(&mut self, category: StatusCategory) {
        match category {
            StatusCategory::Review => self.review += 1,
            StatusCategory::Pending => self.pending += 1,
            StatusCategory::Transmissions => self.transmissions += 1,
            StatusCategory::Inspection => self.inspection += 1,
            StatusCategory::Released => self.released += 1,
            StatusCategory::Unclassified => {}
        }
    }
}

pub fn aggregate(records: &[ShipmentRecord]) -> StatsSnapshot {
    let mut stats = StatsSnapshot {
        total: records.len(),
        ..StatsSnapshot::default()
    };
    for record in records {
        stats.bump(record.category());
    }
    stats
}

/// One slice of the distribution ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub category: StatusCategory,
    pub label: &'static str,
    pub color: &'static str,
    pub count: usize,
    pub percent: u32,
}

/// Colour-banded breakdown for the distribution chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    /// Sum of the named buckets only, shown in the centre of the ring.
    pub total: usize,
    /// Empty when `total` is zero.
    pub segments: Vec<Segment>,
}

/// Ring order differs from classification order: Pending is drawn first.
const RING_ORDER: [StatusCategory; 5] = [
    StatusCategory::Pending,
    StatusCategory::Review,
    StatusCategory::Transmissions,
    StatusCategory::Inspection,
    StatusCategory::Released,
];

pub fn distribution(stats: &StatsSnapshot) -> Distribution {
    let total = stats.named_total();
    if total == 0 {
        return Distribution {
            total,
            segments: Vec::new(),
        };
    }

    let segments = RING_ORDER
        .iter()
        .map(|&category| Segment {
            category,
            label: category.label().unwrap_or_default(),
            color: category.color_hex(),
            count: stats.count(category),
            percent: stats.percent(category),
        })
        .collect();

    Distribution { total, segments }
}
