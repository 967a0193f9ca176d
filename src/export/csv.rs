//! CSV writer.

use std::fmt::Write as _;
use std::path::Path;

use super::{write_file, ExportError};
use crate::models::{MetadataField, MetadataRecord};

/// Render records as CSV with a header row.
pub fn to_csv_string(records: &[MetadataRecord]) -> String {
    let mut output = String::new();

    let header: Vec<&str> = MetadataField::ALL.iter().map(|f| f.column_name()).collect();
    let _ = writeln!(output, "{}", header.join(","));

    for record in records {
        let row: Vec<String> = record.iter().map(|(_, value)| escape_csv(value)).collect();
        let _ = writeln!(output, "{}", row.join(","));
    }
    output
}

pub fn write_csv(path: &Path, records: &[MetadataRecord]) -> Result<(), ExportError> {
    write_file(path, &to_csv_string(records))
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
