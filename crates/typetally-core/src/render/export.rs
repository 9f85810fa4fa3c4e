/// Machine-readable exports of a report.
use super::RenderError;
use crate::analysis::Report;
use crate::model::format_percentage;

/// Pretty-printed JSON with a trailing newline.
pub fn to_json(report: &Report) -> Result<String, RenderError> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

/// CSV with a header row. Percentages use the same one-decimal precision
/// as the table, without the `%` sign.
pub fn to_csv(report: &Report) -> Result<String, RenderError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["type", "total_bytes", "file_count", "percentage"])?;
    for row in &report.rows {
        let total_bytes = row.total_bytes.to_string();
        let file_count = row.file_count.to_string();
        let percentage = format_percentage(row.percentage);
        writer.write_record([
            row.label.as_str(),
            total_bytes.as_str(),
            file_count.as_str(),
            percentage.trim_end_matches('%'),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}
