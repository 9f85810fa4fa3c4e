/// Analysis modules: folding scan results into a report.

pub mod aggregate;
pub mod report;

pub use aggregate::{AggregateState, LabelTotals};
pub use report::{Report, ReportRow};
