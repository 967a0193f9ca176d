//! External tool discovery and process helpers.
//!
//! Text extraction shells out to Poppler (`pdfinfo`, `pdftotext`,
//! `pdftoppm`) and Tesseract. Availability is probed once at startup and
//! carried around as an [`OcrCapability`] value.

use std::process::Output;

pub const PDFINFO_NOT_FOUND: &str = "pdfinfo not found (install poppler-utils)";
pub const PDFTOTEXT_NOT_FOUND: &str = "pdftotext not found (install poppler-utils)";
pub const PDFTOPPM_NOT_FOUND: &str = "pdftoppm not found (install poppler-utils)";
pub const TESSERACT_NOT_FOUND: &str = "tesseract not found (install tesseract-ocr)";

/// Tools the pipeline can use, in the order `check` reports them.
pub const TOOLS: [&str; 4] = ["pdfinfo", "pdftotext", "pdftoppm", "tesseract"];

/// Check if a binary is available in PATH.
pub fn check_binary(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Report availability of every external tool.
pub fn check_tools() -> Vec<(String, bool)> {
    TOOLS
        .iter()
        .map(|tool| (tool.to_string(), check_binary(tool)))
        .collect()
}

/// Outcome of running a child process, normalized for the callers.
pub enum CmdOutcome {
    Success(String),
    Failed(String),
    NotFound,
    Io(std::io::Error),
}

/// Classify command output, capturing stdout on success and stderr on failure.
pub fn classify_output(result: std::io::Result<Output>) -> CmdOutcome {
    match result {
        Ok(output) if output.status.success() => {
            CmdOutcome::Success(String::from_utf8_lossy(&output.stdout).into_owned())
        }
        Ok(output) => CmdOutcome::Failed(String::from_utf8_lossy(&output.stderr).into_owned()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => CmdOutcome::NotFound,
        Err(e) => CmdOutcome::Io(e),
    }
}

/// Whether the OCR toolchain can be used for this process.
///
/// Probed once when the pipeline is built and never re-probed; tests
/// construct it directly to toggle OCR per case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OcrCapability {
    available: bool,
}

impl OcrCapability {
    /// Probe PATH for `pdftoppm` and `tesseract`.
    pub fn probe() -> Self {
        let available = check_binary("pdftoppm") && check_binary("tesseract");
        if available {
            tracing::debug!("OCR toolchain available");
        } else {
            tracing::warn!("OCR toolchain not available; scanned PDFs will yield no text");
        }
        Self { available }
    }

    pub fn enabled() -> Self {
        Self { available: true }
    }

    pub fn disabled() -> Self {
        Self { available: false }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }
}
