// src/status.rs

use serde::Serialize;

/// Closed set of shipment states derived from the free-text status cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StatusCategory {
    Review,
    Pending,
    Transmissions,
    Inspection,
    Released,
    Unclassified,
}

/// Evaluation order. A status text matching several keyword sets lands in
/// the first one listed here ("pending review" is Review).
const KEYWORDS: &[(StatusCategory, &[&str])] = &[
    (StatusCategory::Review, &["review", "revisión", "revision"]),
    (StatusCategory::Pending, &["pending", "pendiente", "espera"]),
    (
        StatusCategory::Transmissions,
        &["transmission", "transmisión", "transmision", "enviado"],
    ),
    (
        StatusCategory::Inspection,
        &["inspection", "inspección", "inspeccion"],
    ),
    (
        StatusCategory::Released,
        &["released", "liberado", "completado", "entregado"],
    ),
];

impl StatusCategory {
    /// The five named buckets, in classification order.
    pub const NAMED: [StatusCategory; 5] = [
        StatusCategory::Review,
        StatusCategory::Pending,
        StatusCategory::Transmissions,
        StatusCategory::Inspection,
        StatusCategory::Released,
    ];

    /// Display label; Unclassified has none and shows the raw text instead.
    pub fn label(self) -> Option<&'static str> {
        match self {
            StatusCategory::Review => Some("Revisión"),
            StatusCategory::Pending => Some("Pendiente"),
            StatusCategory::Transmissions => Some("Transmisión"),
            StatusCategory::Inspection => Some("Inspección"),
            StatusCategory::Released => Some("Liberado"),
            StatusCategory::Unclassified => None,
        }
    }

    /// Chart colour name.
    pub fn color_name(self) -> &'static str {
        match self {
            StatusCategory::Review => "blue",
            StatusCategory::Pending => "yellow",
            StatusCategory::Transmissions => "purple",
            StatusCategory::Inspection => "orange",
            StatusCategory::Released => "green",
            StatusCategory::Unclassified => "slate",
        }
    }

    pub fn color_hex(self) -> &'static str {
        match self {
            StatusCategory::Review => "#3b82f6",
            StatusCategory::Pending => "#eab308",
            StatusCategory::Transmissions => "#a855f7",
            StatusCategory::Inspection => "#f97316",
            StatusCategory::Released => "#22c55e",
            StatusCategory::Unclassified => "#64748b",
        }
    }
}

/// Map free-text status to its category by case-insensitive containment.
pub fn classify(status: &str) -> StatusCategory {
    let lower = status.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(category, _)| *category)
        .unwrap_or(StatusCategory::Unclassified)
}

/// Badge text for a raw status: the category label, or the raw text itself.
pub fn display_label(status: &str) -> String {
    classify(status)
        .label()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}
