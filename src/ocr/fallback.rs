//! OCR fallback for PDFs without embedded text.
//!
//! Pages are rasterized once, then each page is recognized with the
//! bilingual language pair. A page whose bilingual pass fails is retried with
//! the primary language alone; if that also fails the page is skipped.
//! Only a failure to rasterize aborts the whole document.

use std::path::Path;

use tempfile::TempDir;
use tracing::{debug, info, warn};

use super::backend::{OcrBackend, PageImage, PageRasterizer};
use super::pdf_utils::Pdftoppm;
use super::tesseract::TesseractBackend;
use super::tools::OcrCapability;
use crate::config::ExtractionConfig;

/// Primary language model plus an optional secondary one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    pub primary: String,
    pub secondary: Option<String>,
}

impl LanguagePair {
    pub fn new(primary: impl Into<String>, secondary: Option<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.filter(|s| !s.trim().is_empty()),
        }
    }

    /// Selector for the combined model, e.g. `eng+hin`.
    pub fn combined(&self) -> String {
        match &self.secondary {
            Some(secondary) => format!("{}+{}", self.primary, secondary),
            None => self.primary.clone(),
        }
    }
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self::new("eng", Some("hin".to_string()))
    }
}

/// Text recognized on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrPage {
    pub number: u32,
    pub text: String,
}

/// Rasterize-and-recognize fallback used when a PDF has no text layer.
pub struct OcrFallback {
    capability: OcrCapability,
    rasterizer: Box<dyn PageRasterizer>,
    backend: Box<dyn OcrBackend>,
    languages: LanguagePair,
    dpi: u32,
}

impl OcrFallback {
    /// Build the pdftoppm + Tesseract chain from configuration.
    pub fn from_config(capability: OcrCapability, config: &ExtractionConfig) -> Self {
        Self::new(
            capability,
            Box::new(Pdftoppm),
            Box::new(TesseractBackend::new()),
            LanguagePair::new(
                config.ocr_primary_language.clone(),
                config.ocr_secondary_language.clone(),
            ),
            config.ocr_dpi,
        )
    }

    pub fn new(
        capability: OcrCapability,
        rasterizer: Box<dyn PageRasterizer>,
        backend: Box<dyn OcrBackend>,
        languages: LanguagePair,
        dpi: u32,
    ) -> Self {
        Self {
            capability,
            rasterizer,
            backend,
            languages,
            dpi,
        }
    }

    pub fn is_available(&self) -> bool {
        self.capability.is_available()
    }

    /// Recognize pages `1..=max_pages` and render them under page headers.
    pub fn recognize(&self, pdf_path: &Path, max_pages: u32) -> String {
        self.recognize_pages(pdf_path, max_pages)
            .iter()
            .map(|page| format!("--- Page {} (OCR) ---\n{}\n", page.number, page.text))
            .collect()
    }

    /// Recognize pages `1..=max_pages`, keeping only pages that produced text.
    pub fn recognize_pages(&self, pdf_path: &Path, max_pages: u32) -> Vec<OcrPage> {
        if !self.capability.is_available() {
            debug!("OCR not available, skipping {}", pdf_path.display());
            return Vec::new();
        }
        if max_pages == 0 {
            return Vec::new();
        }

        let temp_dir = match TempDir::new() {
            Ok(dir) => dir,
            Err(e) => {
                warn!("OCR aborted, could not create temp dir: {}", e);
                return Vec::new();
            }
        };

        info!(
            "Converting {} to images for OCR ({} DPI, up to {} pages)",
            pdf_path.display(),
            self.dpi,
            max_pages
        );
        let images = match self
            .rasterizer
            .rasterize(pdf_path, 1, max_pages, self.dpi, temp_dir.path())
        {
            Ok(images) => images,
            Err(e) => {
                warn!("OCR extraction failed for {}: {}", pdf_path.display(), e);
                return Vec::new();
            }
        };

        let mut pages = Vec::with_capacity(images.len());
        for image in &images {
            match self.recognize_image(image) {
                Some(text) if !text.trim().is_empty() => {
                    debug!("OCR found {} characters on page {}", text.len(), image.page);
                    pages.push(OcrPage {
                        number: image.page,
                        text,
                    });
                }
                _ => debug!("No text found on page {}", image.page),
            }
        }
        pages
    }

    /// Bilingual pass first, then the primary language alone.
    fn recognize_image(&self, image: &PageImage) -> Option<String> {
        let combined = self.languages.combined();
        match self.backend.run_ocr(&image.path, &combined) {
            Ok(text) => return Some(text),
            Err(e) => debug!(
                "{} -l {} failed on page {}: {}",
                self.backend.name(),
                combined,
                image.page,
                e
            ),
        }

        if self.languages.secondary.is_none() {
            return None;
        }

        match self.backend.run_ocr(&image.path, &self.languages.primary) {
            Ok(text) => Some(text),
            Err(e) => {
                debug!(
                    "{} -l {} failed on page {}, skipping: {}",
                    self.backend.name(),
                    self.languages.primary,
                    image.page,
                    e
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::backend::OcrError;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    struct FakeRasterizer {
        pages: u32,
        fail: bool,
    }

    impl PageRasterizer for FakeRasterizer {
        fn rasterize(
            &self,
            _pdf_path: &Path,
            first: u32,
            last: u32,
            _dpi: u32,
            output_dir: &Path,
        ) -> Result<Vec<PageImage>, OcrError> {
            if self.fail {
                return Err(OcrError::RasterizeFailed("corrupt".to_string()));
            }
            Ok((first..=last.min(self.pages))
                .map(|page| PageImage {
                    page,
                    path: output_dir.join(format!("page-{}.png", page)),
                })
                .collect())
        }
    }

    /// Answers per (page, languages) from a script; records every call.
    struct ScriptedOcr {
        script: fn(u32, &str) -> Result<String, OcrError>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl OcrBackend for ScriptedOcr {
        fn name(&self) -> &'static str {
            "scripted"
        }
        fn availability_hint(&self) -> String {
            String::new()
        }
        fn run_ocr(&self, image_path: &Path, languages: &str) -> Result<String, OcrError> {
            let page: u32 = image_path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.strip_prefix("page-"))
                .and_then(|s| s.parse().ok())
                .unwrap_or(0);
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}:{}", page, languages));
            (self.script)(page, languages)
        }
    }

    fn fallback(
        capability: OcrCapability,
        pages: u32,
        fail_raster: bool,
        script: fn(u32, &str) -> Result<String, OcrError>,
    ) -> (OcrFallback, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let ocr = OcrFallback::new(
            capability,
            Box::new(FakeRasterizer {
                pages,
                fail: fail_raster,
            }),
            Box::new(ScriptedOcr {
                script,
                calls: Arc::clone(&calls),
            }),
            LanguagePair::default(),
            200,
        );
        (ocr, calls)
    }

    #[test]
    fn test_disabled_capability_returns_empty() {
        let (ocr, calls) = fallback(OcrCapability::disabled(), 3, false, |_, _| {
            Ok("text".to_string())
        });
        assert_eq!(ocr.recognize(&PathBuf::from("a.pdf"), 3), "");
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_pages_rendered_in_order() {
        let (ocr, _) = fallback(OcrCapability::enabled(), 5, false, |page, _| {
            Ok(format!("page {} text", page))
        });
        assert_eq!(
            ocr.recognize(&PathBuf::from("a.pdf"), 2),
            "--- Page 1 (OCR) ---\npage 1 text\n--- Page 2 (OCR) ---\npage 2 text\n"
        );
    }

    #[test]
    fn test_bilingual_failure_retries_primary() {
        let (ocr, calls) = fallback(OcrCapability::enabled(), 1, false, |_, langs| {
            if langs == "eng+hin" {
                Err(OcrError::OcrFailed("hin traineddata missing".to_string()))
            } else {
                Ok("english only".to_string())
            }
        });
        let pages = ocr.recognize_pages(&PathBuf::from("a.pdf"), 3);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].text, "english only");
        assert_eq!(*calls.lock().unwrap(), vec!["1:eng+hin", "1:eng"]);
    }

    #[test]
    fn test_failed_page_is_skipped() {
        let (ocr, _) = fallback(OcrCapability::enabled(), 3, false, |page, _| {
            if page == 2 {
                Err(OcrError::OcrFailed("boom".to_string()))
            } else {
                Ok(format!("p{}", page))
            }
        });
        let pages = ocr.recognize_pages(&PathBuf::from("a.pdf"), 3);
        let numbers: Vec<u32> = pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 3]);
    }

    #[test]
    fn test_whitespace_page_contributes_nothing() {
        let (ocr, _) = fallback(OcrCapability::enabled(), 2, false, |page, _| {
            Ok(if page == 1 { " \n\t".to_string() } else { "body".to_string() })
        });
        let pages = ocr.recognize_pages(&PathBuf::from("a.pdf"), 2);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].number, 2);
    }

    #[test]
    fn test_rasterize_failure_aborts_document() {
        let (ocr, calls) = fallback(OcrCapability::enabled(), 3, true, |_, _| {
            Ok("never".to_string())
        });
        assert_eq!(ocr.recognize(&PathBuf::from("a.pdf"), 3), "");
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_language_pair_combined() {
        assert_eq!(LanguagePair::default().combined(), "eng+hin");
        assert_eq!(LanguagePair::new("eng", None).combined(), "eng");
        assert_eq!(
            LanguagePair::new("eng", Some(" ".to_string())).combined(),
            "eng"
        );
    }
}
