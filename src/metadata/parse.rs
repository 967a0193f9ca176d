//! Parsing of language-model replies into partial metadata.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::models::{AiExtraction, MetadataField};

/// Greedy: spans from the first `{` to the last `}`.
static JSON_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// Reply keys and the fields they populate. `format` and `editor` are never
/// taken from the model.
const REPLY_KEYS: &[(&str, MetadataField)] = &[
    ("title", MetadataField::Title),
    ("author", MetadataField::Author),
    ("year", MetadataField::Year),
    ("publisher", MetadataField::Publisher),
    ("language", MetadataField::Language),
    ("pages", MetadataField::PageCount),
];

#[derive(Debug, Error)]
pub enum ResponseParseError {
    #[error("Invalid JSON in model reply: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Model reply is JSON but not an object")]
    NotAnObject,
}

/// Extract the metadata object from a free-form model reply.
///
/// Markdown code fences are removed and the widest `{ ... }` span is parsed.
/// Values equal to `Unknown`, empty values, and values of unusable types are
/// dropped.
pub fn parse_response(reply: &str) -> Result<AiExtraction, ResponseParseError> {
    let cleaned = reply.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();
    let candidate = JSON_OBJECT_RE
        .find(cleaned)
        .map(|m| m.as_str())
        .unwrap_or(cleaned);

    let value: Value = serde_json::from_str(candidate)?;
    let object = value.as_object().ok_or(ResponseParseError::NotAnObject)?;

    let mut extraction = AiExtraction::new();
    for (key, field) in REPLY_KEYS {
        if let Some(text) = object.get(*key).and_then(value_to_text) {
            extraction.insert(*field, text);
        }
    }
    Ok(extraction)
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        Value::Null | Value::Bool(_) | Value::Object(_) => None,
    }
}
