//! PDF-to-image conversion via pdftoppm.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::backend::{OcrError, PageImage, PageRasterizer};
use super::tools::{classify_output, CmdOutcome, PDFTOPPM_NOT_FOUND};

/// Rasterizer backed by Poppler's `pdftoppm`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pdftoppm;

impl PageRasterizer for Pdftoppm {
    fn rasterize(
        &self,
        pdf_path: &Path,
        first: u32,
        last: u32,
        dpi: u32,
        output_dir: &Path,
    ) -> Result<Vec<PageImage>, OcrError> {
        let first_str = first.to_string();
        let last_str = last.to_string();
        let dpi_str = dpi.to_string();

        let output = Command::new("pdftoppm")
            .args(["-png", "-r", &dpi_str, "-f", &first_str, "-l", &last_str])
            .arg(pdf_path)
            .arg(output_dir.join("page"))
            .output();

        match classify_output(output) {
            CmdOutcome::Success(_) => {}
            CmdOutcome::Failed(stderr) => {
                return Err(OcrError::RasterizeFailed(format!(
                    "pdftoppm failed: {}",
                    stderr.trim()
                )))
            }
            CmdOutcome::NotFound => {
                return Err(OcrError::BackendNotAvailable(PDFTOPPM_NOT_FOUND.to_string()))
            }
            CmdOutcome::Io(e) => return Err(OcrError::Io(e)),
        }

        let images: Vec<PageImage> = (first..=last)
            .filter_map(|page| {
                find_page_image(output_dir, page).map(|path| PageImage { page, path })
            })
            .collect();

        if images.is_empty() {
            return Err(OcrError::RasterizeFailed(
                "No images generated from PDF".to_string(),
            ));
        }
        Ok(images)
    }
}

/// Find the image file for a specific page number.
///
/// pdftoppm names files like page-1.png, page-01.png or page-001.png; the
/// padding width depends on the document's total page count.
pub fn find_page_image(temp_path: &Path, page_num: u32) -> Option<PathBuf> {
    for digits in [1, 2, 3, 4] {
        let filename = format!("page-{:0width$}.png", page_num, width = digits);
        let path = temp_path.join(&filename);
        if path.exists() {
            return Some(path);
        }
    }
    None
}
