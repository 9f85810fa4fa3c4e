use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use typetally_core::classifier::ClassifierKind;
use typetally_core::render::ReportFormat;
use typetally_core::scanner::ScanOptions;

#[derive(Parser, Debug)]
#[command(name = "typetally")]
#[command(about = "Classify every file under a directory by content and report bytes per type")]
#[command(version)]
pub struct Cli {
    /// Directory to scan
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Parallel classification workers (default: number of CPUs, 1 = sequential)
    #[arg(short, long)]
    pub jobs: Option<NonZeroUsize>,

    /// Follow symbolic links (links that loop back to an ancestor are skipped)
    #[arg(long)]
    pub follow_links: bool,

    /// Give up on a single file after this many milliseconds (ignored by
    /// magika, which classifies one file at a time)
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Classifier backend (default: magika when compiled in, else builtin)
    #[arg(long, value_enum)]
    pub classifier: Option<Backend>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Verbose output (lists every skipped file on stderr)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Builtin,
    Magika,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
    Csv,
}

impl Cli {
    pub fn scan_options(&self) -> ScanOptions {
        let defaults = ScanOptions::default();
        ScanOptions {
            jobs: self.jobs.map_or(defaults.jobs, NonZeroUsize::get),
            follow_links: self.follow_links,
            classify_timeout: self.timeout_ms.map(Duration::from_millis),
        }
    }

    pub fn classifier_kind(&self) -> ClassifierKind {
        match self.classifier {
            Some(Backend::Builtin) => ClassifierKind::Builtin,
            Some(Backend::Magika) => ClassifierKind::Magika,
            None => ClassifierKind::preferred(),
        }
    }

    pub fn report_format(&self) -> ReportFormat {
        match self.format {
            Format::Table => ReportFormat::Table,
            Format::Json => ReportFormat::Json,
            Format::Csv => ReportFormat::Csv,
        }
    }

    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::ERROR
        } else {
            tracing::Level::WARN
        }
    }
}
