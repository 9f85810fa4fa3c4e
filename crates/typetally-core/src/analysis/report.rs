/// Finished, read-only report data handed to the renderers.
use crate::model::TypeLabel;
use serde::Serialize;
use std::cmp::Ordering;

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub label: TypeLabel,
    pub total_bytes: u64,
    pub file_count: u64,
    /// Share of the grand total, 0.0–100.0.
    pub percentage: f64,
}

impl ReportRow {
    /// Largest first; equal sizes fall back to the label.
    pub fn display_order(a: &Self, b: &Self) -> Ordering {
        b.total_bytes
            .cmp(&a.total_bytes)
            .then_with(|| a.label.cmp(&b.label))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Rows in display order. Each label appears once.
    pub rows: Vec<ReportRow>,
    pub grand_total: u64,
    pub files_analyzed: u64,
    pub files_skipped: u64,
}

impl Report {
    /// `true` when no file was classified, regardless of skips.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
