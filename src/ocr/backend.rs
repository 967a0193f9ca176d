//! OCR engine and rasterizer abstractions.
//!
//! The fallback chain only needs two capabilities from the outside world:
//! turning PDF pages into images, and turning an image into text for a given
//! language selector. Both sit behind traits so tests can swap them out.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from OCR backends and rasterizers.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("Rasterization failed: {0}")]
    RasterizeFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A rasterized page ready for recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    /// 1-based page number in the source PDF.
    pub page: u32,
    pub path: PathBuf,
}

/// Renders PDF pages to image files.
pub trait PageRasterizer: Send + Sync {
    /// Rasterize pages `first..=last` at `dpi` into `output_dir`.
    ///
    /// Returned images are sorted by page number. Pages past the end of the
    /// document are simply absent.
    fn rasterize(
        &self,
        pdf_path: &Path,
        first: u32,
        last: u32,
        dpi: u32,
        output_dir: &Path,
    ) -> Result<Vec<PageImage>, OcrError>;
}

/// Recognizes text in an image.
pub trait OcrBackend: Send + Sync {
    /// Short name for logs (e.g. "tesseract").
    fn name(&self) -> &'static str;

    /// Get a description of what's needed to make this backend available.
    fn availability_hint(&self) -> String;

    /// Extract text from an image using the given language selector
    /// (Tesseract syntax, e.g. `eng+hin`).
    fn run_ocr(&self, image_path: &Path, languages: &str) -> Result<String, OcrError>;
}
