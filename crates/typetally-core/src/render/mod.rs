/// Report renderers.
///
/// Every format renders the same already-ordered [`Report`], so output is
/// byte-identical across runs over an unchanged tree.
pub mod export;
pub mod table;

use crate::analysis::Report;
use thiserror::Error;

pub use table::Table;

/// Output formats understood by [`render`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Aligned human-readable table (the default).
    #[default]
    Table,
    /// Pretty-printed JSON document.
    Json,
    /// One CSV record per label.
    Csv,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV export failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render `report` in the requested format.
pub fn render(report: &Report, format: ReportFormat) -> Result<String, RenderError> {
    match format {
        ReportFormat::Table => Ok(Table(report).to_string()),
        ReportFormat::Json => export::to_json(report),
        ReportFormat::Csv => export::to_csv(report),
    }
}
