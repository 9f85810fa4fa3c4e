/// Streaming aggregation of classified files into per-label totals.
///
/// [`AggregateState`] is folded one [`FileRecord`] at a time and owned by a
/// single thread for the whole run. The grand total is kept in step with
/// the per-label totals after every fold.
use super::report::{Report, ReportRow};
use crate::model::{FileRecord, TypeLabel};
use std::collections::HashMap;

/// Running totals for one label.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LabelTotals {
    pub total_bytes: u64,
    pub file_count: u64,
}

/// The run-wide accumulator.
#[derive(Debug, Default, Clone)]
pub struct AggregateState {
    totals: HashMap<TypeLabel, LabelTotals>,
    grand_total: u64,
    files_analyzed: u64,
}

impl AggregateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record. Zero-byte files still register their label.
    pub fn fold(&mut self, record: FileRecord) {
        let entry = self.totals.entry(record.type_label).or_default();
        entry.total_bytes += record.size_bytes;
        entry.file_count += 1;
        self.grand_total += record.size_bytes;
        self.files_analyzed += 1;
    }

    pub fn grand_total(&self) -> u64 {
        self.grand_total
    }

    pub fn files_analyzed(&self) -> u64 {
        self.files_analyzed
    }

    pub fn totals(&self) -> &HashMap<TypeLabel, LabelTotals> {
        &self.totals
    }

    /// Turn the accumulated totals into an ordered report.
    ///
    /// Rows are sorted by `total_bytes` descending, then label ascending,
    /// so the output never depends on hash iteration order. When the grand
    /// total is zero every percentage is `0.0` instead of NaN; with no
    /// files at all the report has no rows.
    pub fn finalize(self, files_skipped: u64) -> Report {
        let grand_total = self.grand_total;
        let mut rows: Vec<ReportRow> = self
            .totals
            .into_iter()
            .map(|(label, totals)| ReportRow {
                label,
                total_bytes: totals.total_bytes,
                file_count: totals.file_count,
                percentage: percentage_of(totals.total_bytes, grand_total),
            })
            .collect();
        rows.sort_by(ReportRow::display_order);

        Report {
            rows,
            grand_total,
            files_analyzed: self.files_analyzed,
            files_skipped,
        }
    }
}

fn percentage_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}
