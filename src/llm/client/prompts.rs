//! Default LLM prompts for metadata extraction.

/// Default prompt for extracting bibliographic metadata.
///
/// `{content}` is replaced with the leading characters of the acquired text.
pub const DEFAULT_METADATA_PROMPT: &str = "You are given text from a PDF's first two pages.
Extract metadata as JSON with these keys:
title, author, year, publisher, language, pages, format
Text:
{content}";
