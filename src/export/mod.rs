//! Tabular export of metadata records.
//!
//! Every writer emits the eight columns in the same fixed order, one row per
//! document in processing order.

mod csv;
mod json;
mod xlsx;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::MetadataRecord;

pub use csv::{to_csv_string, write_csv};
pub use json::{to_json_string, write_json};
pub use xlsx::{write_xlsx, SHEET_NAME};

/// Filename of the CSV export.
pub const CSV_FILENAME: &str = "pdfs_metadata.csv";

/// Filename of the spreadsheet export.
pub const XLSX_FILENAME: &str = "pdfs_metadata.xlsx";

/// Filename of the JSON export.
pub const JSON_FILENAME: &str = "pdfs_metadata.json";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Paths of the files written by [`export_all`].
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub csv: PathBuf,
    pub xlsx: PathBuf,
    pub json: PathBuf,
}

/// Write all exports into `output_dir`, creating it if needed.
pub fn export_all(
    records: &[MetadataRecord],
    output_dir: &Path,
) -> Result<ExportPaths, ExportError> {
    std::fs::create_dir_all(output_dir).map_err(|source| ExportError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let paths = ExportPaths {
        csv: output_dir.join(CSV_FILENAME),
        xlsx: output_dir.join(XLSX_FILENAME),
        json: output_dir.join(JSON_FILENAME),
    };
    write_csv(&paths.csv, records)?;
    write_xlsx(&paths.xlsx, records)?;
    write_json(&paths.json, records)?;
    Ok(paths)
}

fn write_file(path: &Path, contents: &str) -> Result<(), ExportError> {
    std::fs::write(path, contents).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
