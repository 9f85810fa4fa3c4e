/// Events sent from scanner threads to the folding thread.
use crate::error::SkippedEntry;
use crate::model::FileRecord;

/// Outcome for one walked entry.
///
/// Records flow to the aggregator; skips are counted (and logged at debug
/// level) but never aggregated.
#[derive(Debug)]
pub enum ScanEvent {
    /// A regular file that was stat'ed and classified.
    Classified(FileRecord),
    /// A non-fatal failure for one entry.
    Skipped(SkippedEntry),
}
