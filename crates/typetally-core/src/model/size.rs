/// Size and percentage formatting, used only at the display boundary.
///
/// All internal sizes are `u64` bytes. Floating point appears only here
/// and in percentage computation.

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Format a byte count with binary scaling (1 KB = 1024 B) and exactly two
/// decimal places, e.g. `350.00 B`, `1.50 KB`.
///
/// Values beyond the petabyte range stay in PB rather than inventing units.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.2} {}", UNITS[unit])
}

/// Format a percentage with one decimal place and a trailing `%`.
pub fn format_percentage(percentage: f64) -> String {
    format!("{percentage:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(format_size(0), "0.00 B");
        assert_eq!(format_size(350), "350.00 B");
        assert_eq!(format_size(1023), "1023.00 B");
    }

    #[test]
    fn test_format_size_kb() {
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
    }

    #[test]
    fn test_format_size_mb_gb_tb() {
        assert_eq!(format_size(1_048_576), "1.00 MB");
        assert_eq!(format_size(1_073_741_824), "1.00 GB");
        assert_eq!(format_size(1_099_511_627_776), "1.00 TB");
    }

    #[test]
    fn test_format_size_caps_at_pb() {
        assert_eq!(format_size(1_125_899_906_842_624), "1.00 PB");
        assert_eq!(format_size(u64::MAX), "16384.00 PB");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.0), "0.0%");
        assert_eq!(format_percentage(57.142_857), "57.1%");
        assert_eq!(format_percentage(42.857_142), "42.9%");
        assert_eq!(format_percentage(100.0), "100.0%");
    }
}
