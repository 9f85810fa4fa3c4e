/// Data model for a TypeTally run.
///
/// Re-exports the per-file record, the opaque type label, and the
/// size-formatting helpers used at the display boundary.
pub mod record;
pub mod size;

pub use record::{FileRecord, TypeLabel};
pub use size::{format_percentage, format_size};
