/// Dependency-free content sniffer.
///
/// Resolution order for a file:
/// 1. Leading bytes matched against a table of well-known magic signatures.
/// 2. MIME type guessed from the extension (`mime_guess`), reduced to a short
///    label: `text/x-python` → `python`, `image/svg+xml` → `svg`.
/// 3. `txt` for UTF-8 text without NUL bytes, `unknown` for anything else.
///
/// Empty files with no recognisable extension are labelled `empty`.
/// Only a bounded prefix is ever read and files are opened read-only.
use super::Classifier;
use crate::error::ClassificationError;
use crate::model::TypeLabel;
use mime_guess::Mime;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes read from the head of each file.
pub const PREFIX_LEN: u64 = 4_096;

/// `(signature, label)` pairs checked in order against the file prefix.
const SIGNATURES: &[(&[u8], &str)] = &[
    (b"%PDF-", "pdf"),
    (b"\x89PNG\r\n\x1a\n", "png"),
    (b"GIF87a", "gif"),
    (b"GIF89a", "gif"),
    (b"\xFF\xD8\xFF", "jpeg"),
    (b"PK\x03\x04", "zip"),
    (b"\x1F\x8B", "gzip"),
    (b"\xFD7zXZ\x00", "xz"),
    (b"\x28\xB5\x2F\xFD", "zstd"),
    (b"7z\xBC\xAF\x27\x1C", "sevenzip"),
    (b"\x7FELF", "elf"),
    (b"\x00asm", "wasm"),
    (b"SQLite format 3\x00", "sqlite"),
    (b"%!PS", "postscript"),
    (b"OggS", "ogg"),
    (b"fLaC", "flac"),
    (b"ID3", "mp3"),
];

#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinClassifier;

impl BuiltinClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Pure labelling step, separated from I/O for testing.
    pub fn label_for(path: &Path, prefix: &[u8]) -> TypeLabel {
        if prefix.is_empty() {
            return guess_from_extension(path).unwrap_or_else(|| TypeLabel::new("empty"));
        }
        if let Some(label) = match_signature(prefix) {
            return TypeLabel::new(label);
        }
        if let Some(label) = guess_from_extension(path) {
            return label;
        }
        if looks_like_text(prefix) {
            TypeLabel::new("txt")
        } else {
            TypeLabel::new("unknown")
        }
    }
}

impl Classifier for BuiltinClassifier {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn classify(&self, path: &Path) -> Result<TypeLabel, ClassificationError> {
        let file = File::open(path).map_err(|e| ClassificationError::io(path, e))?;
        let mut prefix = Vec::with_capacity(PREFIX_LEN as usize);
        file.take(PREFIX_LEN)
            .read_to_end(&mut prefix)
            .map_err(|e| ClassificationError::io(path, e))?;
        Ok(Self::label_for(path, &prefix))
    }
}

fn match_signature(prefix: &[u8]) -> Option<&'static str> {
    SIGNATURES
        .iter()
        .find(|(magic, _)| prefix.starts_with(magic))
        .map(|&(_, label)| label)
}

fn guess_from_extension(path: &Path) -> Option<TypeLabel> {
    mime_guess::from_path(path)
        .first()
        .and_then(|mime| label_from_mime(&mime))
}

/// Reduce a MIME type to a short label. `None` for types that carry no
/// information (`application/octet-stream`).
pub fn label_from_mime(mime: &Mime) -> Option<TypeLabel> {
    let subtype = mime.subtype().as_str();
    match (mime.type_().as_str(), subtype) {
        ("text", "plain") => return Some(TypeLabel::new("txt")),
        (_, "octet-stream") => return None,
        _ => {}
    }
    let name = subtype.split('+').next().unwrap_or(subtype);
    let name = name.strip_prefix("x-").unwrap_or(name);
    let name = name.strip_prefix("vnd.").unwrap_or(name);
    if name.is_empty() {
        None
    } else {
        Some(TypeLabel::new(name))
    }
}

/// UTF-8 without NUL bytes. A multi-byte sequence cut off by the prefix
/// boundary still counts as text.
fn looks_like_text(prefix: &[u8]) -> bool {
    if prefix.contains(&0) {
        return false;
    }
    match std::str::from_utf8(prefix) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}
