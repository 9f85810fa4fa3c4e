/// Plain-text table renderer.
///
/// ```text
///
/// ======================================================================
/// Type                           Total Size           Percentage
/// ======================================================================
/// pdf                            200.00 B                  57.1%
/// python                         150.00 B                  42.9%
/// ======================================================================
/// Total                          350.00 B                 100.0%
/// ======================================================================
/// 3 files analyzed, 0 files skipped
/// ```
use crate::analysis::Report;
use crate::model::{format_percentage, format_size};
use std::fmt;

const RULE_WIDTH: usize = 70;
const TYPE_WIDTH: usize = 30;
const SIZE_WIDTH: usize = 20;
const PERCENT_WIDTH: usize = 10;

/// Message printed instead of a table when nothing was classified.
pub const NO_FILES_MESSAGE: &str = "No files found.";

/// Display adapter: `Table(&report).to_string()`.
pub struct Table<'a>(pub &'a Report);

impl fmt::Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        if report.is_empty() {
            writeln!(f, "{NO_FILES_MESSAGE}")?;
            if report.files_skipped > 0 {
                writeln!(f, "{}", skipped_line(report.files_skipped))?;
            }
            return Ok(());
        }

        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f)?;
        writeln!(f, "{rule}")?;
        write_row(f, "Type", "Total Size", "Percentage")?;
        writeln!(f, "{rule}")?;
        for row in &report.rows {
            write_row(
                f,
                row.label.as_str(),
                &format_size(row.total_bytes),
                &format_percentage(row.percentage),
            )?;
        }
        writeln!(f, "{rule}")?;
        let total_percentage = if report.grand_total > 0 { 100.0 } else { 0.0 };
        write_row(
            f,
            "Total",
            &format_size(report.grand_total),
            &format_percentage(total_percentage),
        )?;
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "{} analyzed, {}",
            plural(report.files_analyzed, "file"),
            skipped_line(report.files_skipped)
        )
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, label: &str, size: &str, percentage: &str) -> fmt::Result {
    writeln!(
        f,
        "{label:<tw$} {size:<sw$} {percentage:>pw$}",
        tw = TYPE_WIDTH,
        sw = SIZE_WIDTH,
        pw = PERCENT_WIDTH
    )
}

fn skipped_line(skipped: u64) -> String {
    format!("{} skipped", plural(skipped, "file"))
}

fn plural(count: u64, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
