//! Data models for bookmeta.

mod document;
mod extracted_text;
mod metadata;

pub use document::DocumentHandle;
pub use extracted_text::{ExtractedText, TextFragment};
pub use metadata::{
    is_concrete, AiExtraction, MetadataField, MetadataRecord, ERROR, PDF_FORMAT,
    PROCESSING_ERROR_TITLE, UNKNOWN,
};
