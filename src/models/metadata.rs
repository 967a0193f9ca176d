//! Bibliographic metadata records.
//!
//! A [`MetadataRecord`] always carries all eight canonical fields. Unresolved
//! fields hold the [`UNKNOWN`] sentinel; the record refuses to store empty
//! strings or to overwrite anything with another sentinel.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Sentinel for a field nothing could resolve.
pub const UNKNOWN: &str = "Unknown";

/// Sentinel used by the batch-level error record.
pub const ERROR: &str = "Error";

/// Title placed on the batch-level error record.
pub const PROCESSING_ERROR_TITLE: &str = "Processing Error";

/// The only format this tool handles.
pub const PDF_FORMAT: &str = "PDF";

/// Canonical metadata fields, in export column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetadataField {
    Title,
    Author,
    Editor,
    Year,
    Publisher,
    Language,
    PageCount,
    Format,
}

impl MetadataField {
    pub const ALL: [MetadataField; 8] = [
        MetadataField::Title,
        MetadataField::Author,
        MetadataField::Editor,
        MetadataField::Year,
        MetadataField::Publisher,
        MetadataField::Language,
        MetadataField::PageCount,
        MetadataField::Format,
    ];

    /// Column header used by the exporters.
    pub fn column_name(&self) -> &'static str {
        match self {
            MetadataField::Title => "Book Title",
            MetadataField::Author => "Author",
            MetadataField::Editor => "Editor",
            MetadataField::Year => "Year of Publishing",
            MetadataField::Publisher => "Publisher",
            MetadataField::Language => "Language",
            MetadataField::PageCount => "Number of Pages",
            MetadataField::Format => "Format",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataField::Title => "title",
            MetadataField::Author => "author",
            MetadataField::Editor => "editor",
            MetadataField::Year => "year",
            MetadataField::Publisher => "publisher",
            MetadataField::Language => "language",
            MetadataField::PageCount => "pages",
            MetadataField::Format => "format",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for MetadataField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// Whether a value is usable as a field value (non-empty, not a sentinel).
pub fn is_concrete(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != UNKNOWN
}

/// Final metadata for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    values: [String; 8],
}

impl Default for MetadataRecord {
    fn default() -> Self {
        let mut values: [String; 8] = std::array::from_fn(|_| UNKNOWN.to_string());
        values[MetadataField::Format.index()] = PDF_FORMAT.to_string();
        Self { values }
    }
}

impl MetadataRecord {
    /// All-sentinel record with the format fixed to PDF.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record emitted when processing a document failed unexpectedly.
    pub fn error() -> Self {
        let mut values: [String; 8] = std::array::from_fn(|_| ERROR.to_string());
        values[MetadataField::Title.index()] = PROCESSING_ERROR_TITLE.to_string();
        values[MetadataField::Format.index()] = PDF_FORMAT.to_string();
        Self { values }
    }

    pub fn get(&self, field: MetadataField) -> &str {
        &self.values[field.index()]
    }

    /// Store a value for a field.
    ///
    /// Empty and sentinel values are ignored so a resolved field can never
    /// regress to `Unknown` or to an empty cell. Returns whether the record
    /// changed.
    pub fn set(&mut self, field: MetadataField, value: impl AsRef<str>) -> bool {
        let value = value.as_ref().trim();
        if !is_concrete(value) {
            return false;
        }
        let slot = &mut self.values[field.index()];
        if slot == value {
            return false;
        }
        *slot = value.to_string();
        true
    }

    /// Whether the field still holds the `Unknown` sentinel.
    pub fn is_unknown(&self, field: MetadataField) -> bool {
        self.get(field) == UNKNOWN
    }

    /// Overlay a partial extraction onto this record, field by field.
    pub fn apply(&mut self, extraction: &AiExtraction) -> usize {
        extraction
            .iter()
            .filter(|(field, value)| self.set(*field, value))
            .count()
    }

    /// Fields paired with their values, in column order.
    pub fn iter(&self) -> impl Iterator<Item = (MetadataField, &str)> {
        MetadataField::ALL
            .iter()
            .map(move |field| (*field, self.get(*field)))
    }
}

impl Serialize for MetadataRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(MetadataField::ALL.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.column_name(), value)?;
        }
        map.end()
    }
}

/// Partial metadata produced by the language-model stage.
///
/// Only concrete values are ever stored; a field missing from the map means
/// the model offered nothing usable for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AiExtraction {
    fields: BTreeMap<MetadataField, String>,
}

impl AiExtraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, skipping sentinels and blanks. Returns whether it was kept.
    pub fn insert(&mut self, field: MetadataField, value: impl Into<String>) -> bool {
        let value = value.into();
        if !is_concrete(&value) {
            return false;
        }
        self.fields.insert(field, value.trim().to_string());
        true
    }

    pub fn get(&self, field: MetadataField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetadataField, &str)> {
        self.fields.iter().map(|(f, v)| (*f, v.as_str()))
    }
}
