//! Filename and trailer heuristics.
//!
//! Deterministic rules over the annotated text: language and title come from
//! the `[FILENAME: ...]` trailer, the page count from the document-info
//! trailer. Every rule either yields a concrete value or leaves the field
//! at `Unknown`.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::{ExtractedText, MetadataField, MetadataRecord};

static FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[FILENAME: (.+?)\]").expect("valid regex"));

static PAGE_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Total pages in document: (\d+)").expect("valid regex"));

/// A rule deriving one field from a filename.
type FilenameRule = fn(&str) -> Option<String>;

/// Filename rules, applied in order.
const FILENAME_RULES: &[(MetadataField, FilenameRule)] = &[
    (MetadataField::Language, language_from_filename),
    (MetadataField::Title, title_from_filename),
];

/// Language terms by priority; the first language with a matching term wins.
const LANGUAGE_TERMS: &[(&str, &[&str])] = &[
    ("Hindi", &["hindi", "हिन्दी"]),
    ("Sanskrit", &["sanskrit", "devanagari"]),
    ("English", &["english", "eng"]),
];

/// Title segments must be longer than this many characters.
const MIN_TITLE_SEGMENT_CHARS: usize = 3;

/// Infers baseline metadata without any external service.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicInferencer;

impl HeuristicInferencer {
    pub fn new() -> Self {
        Self
    }

    pub fn infer(&self, text: &ExtractedText) -> MetadataRecord {
        self.infer_text(&text.render())
    }

    /// Infer from already-rendered annotated text.
    pub fn infer_text(&self, text: &str) -> MetadataRecord {
        let mut record = MetadataRecord::new();

        if let Some(filename) = FILENAME_RE.captures(text).and_then(|c| c.get(1)) {
            let filename = filename.as_str();
            debug!("Analyzing filename: {}", filename);
            for (field, rule) in FILENAME_RULES {
                if let Some(value) = rule(filename) {
                    record.set(*field, value);
                }
            }
        }

        if let Some(pages) = PAGE_COUNT_RE.captures(text).and_then(|c| c.get(1)) {
            record.set(MetadataField::PageCount, pages.as_str());
        }

        record
    }
}

fn language_from_filename(filename: &str) -> Option<String> {
    let lower = filename.to_lowercase();
    LANGUAGE_TERMS
        .iter()
        .find(|(_, terms)| terms.iter().any(|term| lower.contains(term)))
        .map(|(language, _)| language.to_string())
}

fn title_from_filename(filename: &str) -> Option<String> {
    if !filename.contains('_') {
        return None;
    }

    let stem = strip_pdf_extension(filename);

    // Longest segment wins; on ties the earliest one is kept.
    let mut best: Option<&str> = None;
    for segment in stem.split('_').map(str::trim) {
        let len = segment.chars().count();
        if len <= MIN_TITLE_SEGMENT_CHARS {
            continue;
        }
        if best.map_or(true, |b| len > b.chars().count()) {
            best = Some(segment);
        }
    }

    best.map(|segment| segment.replace('-', " ").trim().to_string())
}

fn strip_pdf_extension(filename: &str) -> &str {
    let split = filename.len().saturating_sub(4);
    match filename.get(split..) {
        Some(ext) if ext.eq_ignore_ascii_case(".pdf") => &filename[..split],
        _ => filename,
    }
}
