//! Text acquisition from PDFs: embedded text first, OCR as a fallback.

use std::path::Path;
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::fallback::OcrFallback;
use super::tools::{classify_output, CmdOutcome, PDFINFO_NOT_FOUND, PDFTOTEXT_NOT_FOUND};
use crate::config::ExtractionConfig;
use crate::models::{ExtractedText, TextFragment};

/// Errors that can occur while reading embedded text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Could not open document: {0}")]
    Unreadable(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads the embedded text layer of a PDF, one page at a time.
pub trait PageTextReader: Send + Sync {
    /// Open the document and report its page count.
    fn page_count(&self, path: &Path) -> Result<u32, ExtractionError>;

    /// Embedded text of a 1-based page. Pages without a text layer yield
    /// an empty string.
    fn page_text(&self, path: &Path, page: u32) -> Result<String, ExtractionError>;
}

/// Poppler-backed reader (`pdfinfo` + `pdftotext`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PopplerReader;

impl PageTextReader for PopplerReader {
    fn page_count(&self, path: &Path) -> Result<u32, ExtractionError> {
        let output = Command::new("pdfinfo").arg(path).output();
        let stdout = match classify_output(output) {
            CmdOutcome::Success(stdout) => stdout,
            CmdOutcome::Failed(stderr) => {
                return Err(ExtractionError::Unreadable(stderr.trim().to_string()))
            }
            CmdOutcome::NotFound => {
                return Err(ExtractionError::ToolNotFound(PDFINFO_NOT_FOUND.to_string()))
            }
            CmdOutcome::Io(e) => return Err(ExtractionError::Io(e)),
        };
        parse_pdfinfo_pages(&stdout).ok_or_else(|| {
            ExtractionError::Unreadable("pdfinfo reported no page count".to_string())
        })
    }

    fn page_text(&self, path: &Path, page: u32) -> Result<String, ExtractionError> {
        let page_str = page.to_string();
        let output = Command::new("pdftotext")
            .args(["-layout", "-enc", "UTF-8", "-f", &page_str, "-l", &page_str])
            .arg(path)
            .arg("-") // Output to stdout
            .output();

        match classify_output(output) {
            CmdOutcome::Success(text) => Ok(text),
            CmdOutcome::Failed(stderr) => Err(ExtractionError::ExtractionFailed(format!(
                "pdftotext failed on page {}: {}",
                page,
                stderr.trim()
            ))),
            CmdOutcome::NotFound => Err(ExtractionError::ToolNotFound(
                PDFTOTEXT_NOT_FOUND.to_string(),
            )),
            CmdOutcome::Io(e) => Err(ExtractionError::Io(e)),
        }
    }
}

/// Pull the `Pages:` value out of pdfinfo output.
fn parse_pdfinfo_pages(stdout: &str) -> Option<u32> {
    stdout
        .lines()
        .find(|line| line.starts_with("Pages:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse().ok())
}

/// Acquires annotated text for one document.
///
/// Never fails: a missing or unreadable file produces an empty
/// [`ExtractedText`], and per-page failures are skipped.
pub struct TextAcquirer {
    reader: Box<dyn PageTextReader>,
    ocr: OcrFallback,
    max_pages: u32,
    ocr_max_pages: u32,
}

impl TextAcquirer {
    pub fn new(reader: Box<dyn PageTextReader>, ocr: OcrFallback) -> Self {
        let defaults = ExtractionConfig::default();
        Self {
            reader,
            ocr,
            max_pages: defaults.max_pages,
            ocr_max_pages: defaults.ocr_max_pages,
        }
    }

    /// Poppler reader plus the configured OCR chain.
    pub fn from_config(ocr: OcrFallback, config: &ExtractionConfig) -> Self {
        Self::new(Box::new(PopplerReader), ocr)
            .with_max_pages(config.max_pages)
            .with_ocr_max_pages(config.ocr_max_pages)
    }

    /// Set how many leading pages are inspected for embedded text.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set how many leading pages are OCRed when no embedded text exists.
    pub fn with_ocr_max_pages(mut self, ocr_max_pages: u32) -> Self {
        self.ocr_max_pages = ocr_max_pages;
        self
    }

    /// Acquire text using the configured page limit.
    pub fn acquire(&self, path: &Path) -> ExtractedText {
        self.acquire_with_limit(path, self.max_pages)
    }

    /// Acquire text from at most `max_pages` leading pages.
    pub fn acquire_with_limit(&self, path: &Path, max_pages: u32) -> ExtractedText {
        let mut text = ExtractedText::new();

        if !path.exists() {
            warn!("PDF file not found: {}", path.display());
            return text;
        }

        let total_pages = match self.reader.page_count(path) {
            Ok(count) => count,
            Err(e) => {
                warn!("Error processing PDF {}: {}", path.display(), e);
                return text;
            }
        };
        info!("{} has {} pages", path.display(), total_pages);

        for page in 1..=max_pages.min(total_pages) {
            match self.reader.page_text(path, page) {
                Ok(page_text) if !page_text.trim().is_empty() => {
                    debug!("Found text on page {}: {} characters", page, page_text.len());
                    text.push(TextFragment::Page {
                        number: page,
                        text: page_text,
                    });
                }
                Ok(_) => debug!("No embedded text on page {}", page),
                Err(e) => warn!("Error extracting from page {}: {}", page, e),
            }
        }

        if !text.has_body() {
            info!("No extractable text found in {}, trying OCR", path.display());
            let ocr_pages = self.ocr.recognize_pages(path, self.ocr_max_pages.min(total_pages));
            if ocr_pages.is_empty() {
                warn!("No text found via any method for {}", path.display());
            }
            for page in ocr_pages {
                text.push(TextFragment::OcrPage {
                    number: page.number,
                    text: page.text,
                });
            }
        }

        if let Some(name) = path.file_name().map(|n| n.to_string_lossy()) {
            if !name.is_empty() {
                text.push(TextFragment::Filename(name.into_owned()));
            }
        }
        text.push(TextFragment::PageCount(total_pages));

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::backend::{OcrBackend, OcrError, PageImage, PageRasterizer};
    use crate::ocr::fallback::LanguagePair;
    use crate::ocr::tools::OcrCapability;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    struct FakeReader {
        pages: Result<u32, ()>,
        texts: HashMap<u32, Result<String, ()>>,
    }

    impl PageTextReader for FakeReader {
        fn page_count(&self, _path: &Path) -> Result<u32, ExtractionError> {
            self.pages
                .map_err(|_| ExtractionError::Unreadable("encrypted".to_string()))
        }

        fn page_text(&self, _path: &Path, page: u32) -> Result<String, ExtractionError> {
            match self.texts.get(&page) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(())) => Err(ExtractionError::ExtractionFailed("bad page".to_string())),
                None => Ok(String::new()),
            }
        }
    }

    struct OnePageRasterizer;

    impl PageRasterizer for OnePageRasterizer {
        fn rasterize(
            &self,
            _pdf_path: &Path,
            first: u32,
            _last: u32,
            _dpi: u32,
            output_dir: &Path,
        ) -> Result<Vec<PageImage>, OcrError> {
            Ok(vec![PageImage {
                page: first,
                path: output_dir.join("page-1.png"),
            }])
        }
    }

    /// Records every `(first, last, dpi)` request and returns one image per page.
    #[derive(Clone, Default)]
    struct RecordingRasterizer {
        calls: Arc<Mutex<Vec<(u32, u32, u32)>>>,
    }

    impl RecordingRasterizer {
        fn calls(&self) -> Vec<(u32, u32, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl PageRasterizer for RecordingRasterizer {
        fn rasterize(
            &self,
            _pdf_path: &Path,
            first: u32,
            last: u32,
            dpi: u32,
            output_dir: &Path,
        ) -> Result<Vec<PageImage>, OcrError> {
            self.calls.lock().unwrap().push((first, last, dpi));
            Ok((first..=last)
                .map(|page| PageImage {
                    page,
                    path: output_dir.join(format!("page-{}.png", page)),
                })
                .collect())
        }
    }

    struct FixedOcr(&'static str);

    impl OcrBackend for FixedOcr {
        fn name(&self) -> &'static str {
            "fixed"
        }
        fn availability_hint(&self) -> String {
            String::new()
        }
        fn run_ocr(&self, _image_path: &Path, _languages: &str) -> Result<String, OcrError> {
            Ok(self.0.to_string())
        }
    }

    fn ocr(capability: OcrCapability, text: &'static str) -> OcrFallback {
        OcrFallback::new(
            capability,
            Box::new(OnePageRasterizer),
            Box::new(FixedOcr(text)),
            LanguagePair::default(),
            200,
        )
    }

    fn pdf_fixture(name: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        (dir, path)
    }

    #[test]
    fn test_missing_file_yields_empty_text() {
        let acquirer = TextAcquirer::new(
            Box::new(FakeReader {
                pages: Ok(3),
                texts: HashMap::new(),
            }),
            ocr(OcrCapability::enabled(), "ocr"),
        );
        let text = acquirer.acquire(Path::new("/nonexistent/book.pdf"));
        assert!(text.is_empty());
    }

    #[test]
    fn test_unopenable_document_yields_empty_text() {
        let (_dir, path) = pdf_fixture("locked.pdf");
        let acquirer = TextAcquirer::new(
            Box::new(FakeReader {
                pages: Err(()),
                texts: HashMap::new(),
            }),
            ocr(OcrCapability::enabled(), "ocr"),
        );
        assert!(acquirer.acquire(&path).is_empty());
    }

    #[test]
    fn test_embedded_text_with_trailers() {
        let (_dir, path) = pdf_fixture("Hindi_Kavita-Sangrah.pdf");
        let texts = HashMap::from([
            (1, Ok("Kavita Sangrah".to_string())),
            (2, Err(())),
            (3, Ok("   ".to_string())),
            (4, Ok("Prakashan 1962".to_string())),
            (6, Ok("past the limit".to_string())),
        ]);
        let acquirer = TextAcquirer::new(
            Box::new(FakeReader {
                pages: Ok(120),
                texts,
            }),
            ocr(OcrCapability::enabled(), "should not run"),
        );

        let rendered = acquirer.acquire(&path).render();
        assert_eq!(
            rendered,
            "--- Page 1 ---\nKavita Sangrah\n--- Page 4 ---\nPrakashan 1962\n\
             \n[FILENAME: Hindi_Kavita-Sangrah.pdf]\n\
             \n[DOCUMENT INFO: Total pages in document: 120]\n"
        );
    }

    #[test]
    fn test_ocr_used_when_no_embedded_text() {
        let (_dir, path) = pdf_fixture("scan.pdf");
        let acquirer = TextAcquirer::new(
            Box::new(FakeReader {
                pages: Ok(10),
                texts: HashMap::new(),
            }),
            ocr(OcrCapability::enabled(), "scanned words"),
        );

        let text = acquirer.acquire(&path);
        assert_eq!(
            text.fragments()[0],
            TextFragment::OcrPage {
                number: 1,
                text: "scanned words".to_string()
            }
        );
        assert!(text.render().ends_with("[DOCUMENT INFO: Total pages in document: 10]\n"));
    }

    #[test]
    fn test_trailers_present_without_any_text() {
        let (_dir, path) = pdf_fixture("blank.pdf");
        let acquirer = TextAcquirer::new(
            Box::new(FakeReader {
                pages: Ok(2),
                texts: HashMap::new(),
            }),
            ocr(OcrCapability::disabled(), "unused"),
        );

        let text = acquirer.acquire(&path);
        assert!(!text.has_body());
        assert_eq!(
            text.fragments(),
            &[
                TextFragment::Filename("blank.pdf".to_string()),
                TextFragment::PageCount(2)
            ]
        );
    }

    fn recording_acquirer(pages: u32, rasterizer: &RecordingRasterizer) -> TextAcquirer {
        let ocr = OcrFallback::new(
            OcrCapability::enabled(),
            Box::new(rasterizer.clone()),
            Box::new(FixedOcr("scanned")),
            LanguagePair::default(),
            200,
        );
        TextAcquirer::new(
            Box::new(FakeReader {
                pages: Ok(pages),
                texts: HashMap::new(),
            }),
            ocr,
        )
    }

    #[test]
    fn test_ocr_limited_to_first_three_pages() {
        let (_dir, path) = pdf_fixture("scan.pdf");
        let rasterizer = RecordingRasterizer::default();

        let text = recording_acquirer(10, &rasterizer).acquire(&path);
        assert_eq!(rasterizer.calls(), vec![(1, 3, 200)]);

        let ocr_pages: Vec<u32> = text
            .fragments()
            .iter()
            .filter_map(|fragment| match fragment {
                TextFragment::OcrPage { number, .. } => Some(*number),
                _ => None,
            })
            .collect();
        assert_eq!(ocr_pages, vec![1, 2, 3]);
    }

    #[test]
    fn test_ocr_limited_to_document_length() {
        let (_dir, path) = pdf_fixture("leaflet.pdf");
        let rasterizer = RecordingRasterizer::default();

        recording_acquirer(2, &rasterizer).acquire(&path);
        assert_eq!(rasterizer.calls(), vec![(1, 2, 200)]);
    }

    #[test]
    fn test_ocr_skipped_when_embedded_text_found() {
        let (_dir, path) = pdf_fixture("book.pdf");
        let rasterizer = RecordingRasterizer::default();
        let ocr = OcrFallback::new(
            OcrCapability::enabled(),
            Box::new(rasterizer.clone()),
            Box::new(FixedOcr("scanned")),
            LanguagePair::default(),
            200,
        );
        let acquirer = TextAcquirer::new(
            Box::new(FakeReader {
                pages: Ok(10),
                texts: HashMap::from([(2, Ok("Preface".to_string()))]),
            }),
            ocr,
        );

        acquirer.acquire(&path);
        assert!(rasterizer.calls().is_empty());
    }

    #[test]
    fn test_explicit_page_limit_excludes_later_pages() {
        let (_dir, path) = pdf_fixture("Sanskrit_Grammar-Intro.pdf");
        let texts = HashMap::from([
            (1, Ok("Laghu".to_string())),
            (2, Ok("Siddhanta".to_string())),
            (3, Ok("Kaumudi".to_string())),
        ]);
        let acquirer = TextAcquirer::new(
            Box::new(FakeReader {
                pages: Ok(40),
                texts,
            }),
            ocr(OcrCapability::enabled(), "should not run"),
        );

        let rendered = acquirer.acquire_with_limit(&path, 2).render();
        assert!(rendered.contains("--- Page 2 ---\nSiddhanta\n"));
        assert!(!rendered.contains("Kaumudi"));
        assert!(!rendered.contains("--- Page 3 ---"));
        assert!(rendered.ends_with("[DOCUMENT INFO: Total pages in document: 40]\n"));
    }

    #[test]
    fn test_parse_pdfinfo_pages() {
        let stdout = "Title:          Sample\nProducer:       pdfTeX\nPages:          42\nEncrypted:      no\n";
        assert_eq!(parse_pdfinfo_pages(stdout), Some(42));
        assert_eq!(parse_pdfinfo_pages("Title: x\n"), None);
    }
}
