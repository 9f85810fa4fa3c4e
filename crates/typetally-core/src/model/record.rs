/// Per-file records produced by the scanner and folded by the aggregator.
use compact_str::CompactString;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Opaque content-type identifier returned by a classifier
/// (e.g. `pdf`, `python`, `unknown`).
///
/// Labels have no inherent meaning to TypeTally; the `Ord` impl exists only
/// so the renderer can break size ties deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TypeLabel(CompactString);

impl TypeLabel {
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(CompactString::new(label.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TypeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` keeps width/alignment flags working in table layouts.
        f.pad(self.as_str())
    }
}

/// One classified regular file.
///
/// Built once per file and consumed by the aggregator; the scan never keeps
/// a list of these so memory stays flat on large trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub type_label: TypeLabel,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>, size_bytes: u64, type_label: TypeLabel) -> Self {
        Self {
            path: path.into(),
            size_bytes,
            type_label,
        }
    }
}
