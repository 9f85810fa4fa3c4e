/// Error taxonomy for a TypeTally run.
///
/// Fatal failures end the run with a distinct exit code ([`RunError`]).
/// Everything else is a per-entry failure that becomes a [`SkippedEntry`]:
/// it is logged, counted, and excluded from aggregation.
use crate::render::RenderError;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Exit code for failures outside the documented taxonomy (e.g. a report
/// that could not be serialised).
pub const EXIT_FAILURE: i32 = 1;

/// Exit code for a missing, non-directory or unreadable scan root.
pub const EXIT_INVALID_ROOT: i32 = 2;

/// Exit code for a classifier that failed to initialise.
pub const EXIT_FATAL_STARTUP: i32 = 3;

/// A failure that aborts the whole run before any file is aggregated.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("directory '{}' does not exist", path.display())]
    RootNotFound { path: PathBuf },

    #[error("'{}' is not a directory", path.display())]
    RootNotDirectory { path: PathBuf },

    #[error("cannot access '{}': {source}", path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to initialise {backend} classifier: {message}")]
    ClassifierStartup {
        backend: &'static str,
        message: String,
    },

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl RunError {
    /// `true` for every flavour of invalid scan root.
    pub fn is_invalid_root(&self) -> bool {
        matches!(
            self,
            Self::RootNotFound { .. } | Self::RootNotDirectory { .. } | Self::RootUnreadable { .. }
        )
    }

    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RootNotFound { .. }
            | Self::RootNotDirectory { .. }
            | Self::RootUnreadable { .. } => EXIT_INVALID_ROOT,
            Self::ClassifierStartup { .. } => EXIT_FATAL_STARTUP,
            Self::Render(_) => EXIT_FAILURE,
        }
    }
}

/// Why the classifier could not label one file.
#[derive(Debug, Error)]
pub enum ClassifyCause {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Model(String),
}

/// The classifier could not process a single file.
#[derive(Debug, Error)]
#[error("could not classify {}: {cause}", path.display())]
pub struct ClassificationError {
    pub path: PathBuf,
    #[source]
    pub cause: ClassifyCause,
}

impl ClassificationError {
    pub fn io(path: impl Into<PathBuf>, err: io::Error) -> Self {
        Self {
            path: path.into(),
            cause: ClassifyCause::Io(err),
        }
    }

    pub fn model(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            cause: ClassifyCause::Model(message.into()),
        }
    }
}

/// Why an entry was left out of the aggregate.
#[derive(Debug, Error)]
pub enum SkipReason {
    /// The walker could not read a directory entry (permission denied,
    /// symbolic-link cycle, vanished while listing).
    #[error("unreadable entry: {0}")]
    Walk(String),

    /// A followed link resolves to one of its own ancestor directories.
    #[error("symbolic link cycle back to {}", .0.display())]
    LinkCycle(PathBuf),

    #[error("cannot stat: {0}")]
    Stat(#[source] io::Error),

    #[error("{}", .0.cause)]
    Classify(#[from] ClassificationError),

    #[error("classification timed out after {0:?}")]
    TimedOut(Duration),
}

/// One entry that was recovered locally instead of aborting the run.
#[derive(Debug)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: SkipReason,
}

impl SkippedEntry {
    pub fn new(path: impl Into<PathBuf>, reason: SkipReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }
}

impl fmt::Display for SkippedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}
