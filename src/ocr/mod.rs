//! OCR and text extraction module.
//!
//! Extracts text from PDFs using:
//! - pdftotext (Poppler) for the embedded text layer
//! - pdftoppm + Tesseract OCR for image-only PDFs
//!
//! OCR runs only when none of the inspected pages carried embedded text, and
//! only if the toolchain was found when the pipeline started.

mod backend;
mod extractor;
mod fallback;
mod pdf_utils;
mod tesseract;
mod tools;

pub use backend::{OcrBackend, OcrError, PageImage, PageRasterizer};
pub use extractor::{ExtractionError, PageTextReader, PopplerReader, TextAcquirer};
pub use fallback::{LanguagePair, OcrFallback, OcrPage};
pub use pdf_utils::{find_page_image, Pdftoppm};
pub use tesseract::TesseractBackend;
pub use tools::{check_binary, check_tools, OcrCapability};
