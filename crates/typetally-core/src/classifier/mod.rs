/// Classifier adapter: the seam between TypeTally and a content-type model.
///
/// The scanner only ever sees `Arc<dyn Classifier>`: one instance is built
/// per run, shared by every worker, and dropped when the run ends (on every
/// exit path, including aborts). Tests inject their own implementations.
///
/// Backends:
/// - [`BuiltinClassifier`]: magic-signature sniffing with a MIME guess
///   fallback. Always available.
/// - `MagikaClassifier`: Google's Magika deep-learning model. Requires the
///   `magika` cargo feature.
pub mod builtin;
#[cfg(feature = "magika")]
pub mod magika;

pub use builtin::BuiltinClassifier;
#[cfg(feature = "magika")]
pub use self::magika::MagikaClassifier;

use crate::error::{ClassificationError, RunError};
use crate::model::TypeLabel;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Maps a file on disk to a content-type label.
///
/// Implementations must be deterministic for identical bytes within a run
/// and must never modify the file.
pub trait Classifier: Send + Sync {
    /// Short backend name used in logs and startup errors.
    fn name(&self) -> &'static str;

    /// Classify the file at `path`.
    fn classify(&self, path: &Path) -> Result<TypeLabel, ClassificationError>;

    /// Whether concurrent calls queue behind a single lock. Per-file
    /// deadlines are not applied to such backends.
    fn serialises_calls(&self) -> bool {
        false
    }
}

/// A shared classifier handle, scoped to one run.
pub type SharedClassifier = Arc<dyn Classifier>;

/// Selectable classifier backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierKind {
    Builtin,
    Magika,
}

impl ClassifierKind {
    /// Magika when compiled in, the builtin sniffer otherwise.
    pub fn preferred() -> Self {
        if cfg!(feature = "magika") {
            Self::Magika
        } else {
            Self::Builtin
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Builtin => "builtin",
            Self::Magika => "magika",
        }
    }

    /// Construct the backend. A failure here is fatal to the run.
    pub fn build(self) -> Result<SharedClassifier, RunError> {
        match self {
            Self::Builtin => Ok(Arc::new(BuiltinClassifier::new())),
            #[cfg(feature = "magika")]
            Self::Magika => Ok(Arc::new(MagikaClassifier::new()?)),
            #[cfg(not(feature = "magika"))]
            Self::Magika => Err(RunError::ClassifierStartup {
                backend: "magika",
                message: "this build was compiled without the `magika` feature".into(),
            }),
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
