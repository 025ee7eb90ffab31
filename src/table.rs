// src/table.rs

use crate::record::ShipmentRecord;
use crate::status;
use serde::Serialize;

/// One page of the shipments table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub records: Vec<ShipmentRecord>,
    /// 1-based, as requested (page 0 is read as page 1).
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
    /// 1-based position of the first row shown; 0 on an empty page.
    pub start: usize,
    /// Position of the last row shown; 0 on an empty page.
    pub end: usize,
}

impl Page {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}

/// Slice out one page. A page past the end comes back empty.
pub fn paginate(records: &[ShipmentRecord], page: usize, page_size: usize) -> Page {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total = records.len();
    let page_count = total.div_ceil(page_size);

    let start_idx = (page - 1).saturating_mul(page_size).min(total);
    let end_idx = start_idx.saturating_add(page_size).min(total);
    let slice = &records[start_idx..end_idx];
    let (start, end) = if slice.is_empty() {
        (0, 0)
    } else {
        (start_idx + 1, end_idx)
    };

    Page {
        records: slice.to_vec(),
        page,
        page_count,
        total,
        start,
        end,
    }
}

/// Case-insensitive match on first leg, second leg, raw status and reference.
pub fn search(records: &[ShipmentRecord], query: &str) -> Vec<ShipmentRecord> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| {
            let haystack = format!(
                "{} {} {} {}",
                r.mawb_first_leg, r.mawb_second_leg, r.status, r.reference
            )
            .to_lowercase();
            haystack.contains(&needle)
        })
        .cloned()
        .collect()
}

const PLACEHOLDER: &str = "-";
const NO_COMMENTS: &str = "Sin comentarios disponibles";

/// Detail view of a single shipment, ready to display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentDetail {
    pub title: String,
    pub mawb_first_leg: String,
    pub mawb_second_leg: String,
    pub status_label: String,
    pub status_color: &'static str,
    pub review_start_date: String,
    pub review_end_date: String,
    pub time_to_complete: String,
    pub prealerta_date: String,
    pub arrival_date: String,
    pub release_date: String,
    pub reference: String,
    pub comments: String,
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

pub fn detail(record: &ShipmentRecord) -> ShipmentDetail {
    ShipmentDetail {
        title: format!("{} / {}", record.mawb_first_leg, record.mawb_second_leg),
        mawb_first_leg: or_placeholder(&record.mawb_first_leg, PLACEHOLDER),
        mawb_second_leg: or_placeholder(&record.mawb_second_leg, PLACEHOLDER),
        status_label: status::display_label(&record.status),
        status_color: record.category().color_name(),
        review_start_date: or_placeholder(&record.review_start_date, PLACEHOLDER),
        review_end_date: or_placeholder(&record.review_end_date, PLACEHOLDER),
        time_to_complete: or_placeholder(&record.time_to_complete, PLACEHOLDER),
        prealerta_date: or_placeholder(&record.prealerta_date, PLACEHOLDER),
        arrival_date: or_placeholder(&record.arrival_date, PLACEHOLDER),
        release_date: or_placeholder(&record.release_date, PLACEHOLDER),
        reference: or_placeholder(&record.reference, PLACEHOLDER),
        comments: or_placeholder(&record.comments, NO_COMMENTS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<ShipmentRecord> {
        (1..=n)
            .map(|i| ShipmentRecord {
                mawb_first_leg: format!("M{i}"),
                status: "Pending".into(),
                ..ShipmentRecord::default()
            })
            .collect()
    }

    #[test]
    fn twelve_records_in_pages_of_five() {
        let records = numbered(12);
        let sizes: Vec<usize> = (1..=3).map(|p| paginate(&records, p, 5).records.len()).collect();
        assert_eq!(sizes, vec![5, 5, 2]);

        let last = paginate(&records, 3, 5);
        assert_eq!(last.page_count, 3);
        assert_eq!((last.start, last.end, last.total), (11, 12, 12));
        assert!(last.has_prev());
        assert!(!last.has_next());
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = paginate(&numbered(12), 4, 5);
        assert!(page.records.is_empty());
        assert_eq!(page.page_count, 3);
        assert_eq!((page.start, page.end), (0, 0));
        assert!(!page.has_next());
    }

    #[test]
    fn page_zero_reads_as_first_page() {
        let page = paginate(&numbered(3), 0, 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.records[0].mawb_first_leg, "M1");
        assert!(!page.has_prev());
    }

    #[test]
    fn empty_collection_paginates() {
        let page = paginate(&[], 1, 10);
        assert_eq!(page.page_count, 0);
        assert!(page.records.is_empty());
    }

    #[test]
    fn search_matches_listed_fields_only() {
        let records = vec![
            ShipmentRecord {
                mawb_first_leg: "123".into(),
                mawb_second_leg: "456".into(),
                status: "In Review".into(),
                ..ShipmentRecord::default()
            },
            ShipmentRecord {
                mawb_first_leg: "789".into(),
                status: "Pending".into(),
                reference: "REF-9".into(),
                comments: "123 mentioned in comments".into(),
                ..ShipmentRecord::default()
            },
        ];
        let hits = search(&records, "123");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].mawb_first_leg, "123");

        assert_eq!(search(&records, "ref-9")[0].mawb_first_leg, "789");
        assert_eq!(search(&records, "in review").len(), 1);
        assert_eq!(search(&records, "").len(), 2);
    }

    #[test]
    fn detail_uses_placeholders() {
        let d = detail(&ShipmentRecord {
            mawb_first_leg: "123".into(),
            status: "Liberado".into(),
            ..ShipmentRecord::default()
        });
        assert_eq!(d.title, "123 / ");
        assert_eq!(d.mawb_second_leg, "-");
        assert_eq!(d.status_label, "Liberado");
        assert_eq!(d.status_color, "green");
        assert_eq!(d.arrival_date, "-");
        assert_eq!(d.comments, "Sin comentarios disponibles");
    }
}
