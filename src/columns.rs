// src/columns.rs

use tracing::info;

/// Semantic fields a sheet column can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    MawbFirstLeg,
    MawbSecondLeg,
    Status,
    ReviewStart,
    ReviewEnd,
    TimeToComplete,
    Prealerta,
    Arribo,
    Liberacion,
    ReleasedQuantity,
    Reference,
    Comments,
}

/// A field and the header fragments that identify it, most specific first.
pub struct FieldSpec {
    pub field: Field,
    pub patterns: &'static [&'static str],
}

/// Header vocabulary. New sheet layouts only need a row here.
pub const FIELD_TABLE: &[FieldSpec] = &[
    FieldSpec { field: Field::MawbFirstLeg, patterns: &["mawb first", "first leg", "mawb1", "mawb 1"] },
    FieldSpec { field: Field::MawbSecondLeg, patterns: &["mawb second", "second leg", "mawb2", "mawb 2"] },
    FieldSpec { field: Field::Status, patterns: &["status"] },
    FieldSpec { field: Field::ReviewStart, patterns: &["start review"] },
    FieldSpec { field: Field::ReviewEnd, patterns: &["end review"] },
    FieldSpec { field: Field::TimeToComplete, patterns: &["time to complete"] },
    FieldSpec { field: Field::Prealerta, patterns: &["prealerta"] },
    FieldSpec { field: Field::Arribo, patterns: &["arribo"] },
    FieldSpec { field: Field::Liberacion, patterns: &["liberacion", "liberación"] },
    FieldSpec { field: Field::ReleasedQuantity, patterns: &["pq liberados", "po liberados"] },
    FieldSpec { field: Field::Reference, patterns: &["referencias", "reference"] },
    FieldSpec { field: Field::Comments, patterns: &["comentario", "comment"] },
];

/// Index of the first header containing any pattern, trying patterns in order.
///
/// `headers` are expected lower-cased and trimmed.
pub fn find_column(headers: &[String], patterns: &[&str]) -> Option<usize> {
    patterns.iter().find_map(|pattern| {
        let pattern = pattern.to_lowercase();
        headers.iter().position(|h| h.contains(&pattern))
    })
}

/// Resolved column index per field; `None` when the sheet lacks it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub mawb_first_leg: Option<usize>,
    pub mawb_second_leg: Option<usize>,
    pub status: Option<usize>,
    pub review_start: Option<usize>,
    pub review_end: Option<usize>,
    pub time_to_complete: Option<usize>,
    pub prealerta: Option<usize>,
    pub arribo: Option<usize>,
    pub liberacion: Option<usize>,
    pub released_quantity: Option<usize>,
    pub reference: Option<usize>,
    pub comments: Option<usize>,
}

impl ColumnMap {
    /// Resolve every field in `table` against a raw header row.
    pub fn resolve_with(header_row: &[String], table: &[FieldSpec]) -> Self {
        let headers: Vec<String> = header_row.iter().map(|h| h.trim().to_lowercase()).collect();
        let mut map = ColumnMap::default();

        for spec in table {
            *map.slot_mut(spec.field) = find_column(&headers, spec.patterns);
        }

        info!(
            mawb_first = ?map.mawb_first_leg,
            mawb_second = ?map.mawb_second_leg,
            status = ?map.status,
            start_review = ?map.review_start,
            end_review = ?map.review_end,
            liberacion = ?map.liberacion,
            pq_liberados = ?map.released_quantity,
            "Columns detected"
        );

        map
    }

    pub fn resolve(header_row: &[String]) -> Self {
        Self::resolve_with(header_row, FIELD_TABLE)
    }

    pub fn get(&self, field: Field) -> Option<usize> {
        match field {
            Field::MawbFirstLeg => self.mawb_first_leg,
            Field::MawbSecondLeg => self.mawb_second_leg,
            Field::Status => self.status,
            Field::ReviewStart => self.review_start,
            Field::ReviewEnd => self.review_end,
            Field::TimeToComplete => self.time_to_complete,
            Field::Prealerta => self.prealerta,
            Field::Arribo => self.arribo,
            Field::Liberacion => self.liberacion,
            Field::ReleasedQuantity => self.released_quantity,
            Field::Reference => self.reference,
            Field::Comments => self.comments,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<usize> {
        match field {
            Field::MawbFirstLeg => &mut self.mawb_first_leg,
            Field::MawbSecondLeg => &mut self.mawb_second_leg,
            Field::Status => &mut self.status,
            Field::ReviewStart => &mut self.review_start,
            Field::ReviewEnd => &mut self.review_end,
            Field::TimeToComplete => &mut self.time_to_complete,
            Field::Prealerta => &mut self.prealerta,
            Field::Arribo => &mut self.arribo,
            Field::Liberacion => &mut self.liberacion,
            Field::ReleasedQuantity => &mut self.released_quantity,
            Field::Reference => &mut self.reference,
            Field::Comments => &mut self.comments,
        }
    }
}
