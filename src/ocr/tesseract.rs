//! Tesseract OCR backend.
//!
//! Uses the `tesseract` command-line tool; language packs are selected per
//! call so the fallback chain can retry with a narrower model.

use std::path::Path;
use std::process::Command;

use super::backend::{OcrBackend, OcrError};
use super::tools::{check_binary, classify_output, CmdOutcome, TESSERACT_NOT_FOUND};

/// Tesseract OCR backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct TesseractBackend;

impl TesseractBackend {
    pub fn new() -> Self {
        Self
    }
}

impl OcrBackend for TesseractBackend {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn availability_hint(&self) -> String {
        if !check_binary("tesseract") {
            "Tesseract not installed. Install with: apt install tesseract-ocr tesseract-ocr-hin"
                .to_string()
        } else if !check_binary("pdftoppm") {
            "pdftoppm not installed. Install with: apt install poppler-utils".to_string()
        } else {
            "Tesseract is available".to_string()
        }
    }

    fn run_ocr(&self, image_path: &Path, languages: &str) -> Result<String, OcrError> {
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .args(["-l", languages])
            .output();

        match classify_output(output) {
            CmdOutcome::Success(text) => Ok(text),
            CmdOutcome::Failed(stderr) => Err(OcrError::OcrFailed(format!(
                "tesseract -l {} failed: {}",
                languages,
                stderr.trim()
            ))),
            CmdOutcome::NotFound => Err(OcrError::BackendNotAvailable(
                TESSERACT_NOT_FOUND.to_string(),
            )),
            CmdOutcome::Io(e) => Err(OcrError::Io(e)),
        }
    }
}
