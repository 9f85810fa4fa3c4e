/// TypeTally Core: scanning, classification, aggregation and rendering.
///
/// This crate contains all business logic with no terminal or argument
/// parsing dependencies. The CLI crate is a thin layer on top.
///
/// # Modules
///
/// - [`model`]: Per-file records, type labels and size formatting.
/// - [`classifier`]: The content-type classifier seam and its backends.
/// - [`scanner`]: Directory walking and the classification worker pool.
/// - [`analysis`]: Per-label aggregation and report rows.
/// - [`render`]: Table, JSON and CSV report renderers.
/// - [`pipeline`]: The run orchestrator and its phase state machine.
/// - [`error`]: Fatal errors, per-file skips and exit codes.
pub mod analysis;
pub mod classifier;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod scanner;

pub use error::{RunError, SkipReason, SkippedEntry};
pub use pipeline::{Orchestrator, RunOutcome, RunPhase};
