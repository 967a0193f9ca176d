//! JSON writer.

use std::path::Path;

use super::{write_file, ExportError};
use crate::models::MetadataRecord;

/// Render records as a pretty-printed JSON array of column-keyed objects.
pub fn to_json_string(records: &[MetadataRecord]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn write_json(path: &Path, records: &[MetadataRecord]) -> Result<(), ExportError> {
    write_file(path, &to_json_string(records)?)
}
