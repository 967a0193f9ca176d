//! Input document handles.

use std::path::{Path, PathBuf};

/// One PDF queued for metadata extraction.
///
/// Handles are created by the batch orchestrator and never mutated; the
/// display filename is derived from the path once, up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    path: PathBuf,
    filename: String,
}

impl DocumentHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, filename }
    }

    /// Filesystem path of the document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bare filename, used in trailer markers and progress output.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Whether the path carries a `.pdf` extension (any case).
    pub fn is_pdf(&self) -> bool {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
    }
}
