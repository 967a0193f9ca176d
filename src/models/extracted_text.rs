//! Text acquired from a document, with its trailer markers.

use std::fmt;

/// One piece of acquired text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextFragment {
    /// Embedded text from a page's content stream.
    Page { number: u32, text: String },
    /// Text recognized from a rasterized page.
    OcrPage { number: u32, text: String },
    /// Trailer carrying the source filename.
    Filename(String),
    /// Trailer carrying the true total page count of the document.
    PageCount(u32),
}

impl TextFragment {
    /// Trailers annotate the document rather than carry page content.
    pub fn is_trailer(&self) -> bool {
        matches!(self, TextFragment::Filename(_) | TextFragment::PageCount(_))
    }

    fn body(&self) -> Option<&str> {
        match self {
            TextFragment::Page { text, .. } | TextFragment::OcrPage { text, .. } => Some(text),
            _ => None,
        }
    }

    fn render_into(&self, out: &mut String) {
        match self {
            TextFragment::Page { number, text } => {
                out.push_str(&format!("--- Page {} ---\n{}\n", number, text));
            }
            TextFragment::OcrPage { number, text } => {
                out.push_str(&format!("--- Page {} (OCR) ---\n{}\n", number, text));
            }
            TextFragment::Filename(name) => {
                out.push_str(&format!("\n[FILENAME: {}]\n", name));
            }
            TextFragment::PageCount(count) => {
                out.push_str(&format!(
                    "\n[DOCUMENT INFO: Total pages in document: {}]\n",
                    count
                ));
            }
        }
    }
}

/// Ordered text fragments for one document.
///
/// An empty value is legitimate and means nothing could be read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    fragments: Vec<TextFragment>,
}

impl ExtractedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: TextFragment) {
        self.fragments.push(fragment);
    }

    pub fn fragments(&self) -> &[TextFragment] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Whether any page (embedded or OCR) contributed text.
    pub fn has_body(&self) -> bool {
        self.fragments.iter().any(|f| f.body().is_some())
    }

    /// Non-whitespace characters of page text, ignoring trailers and headers.
    pub fn body_char_count(&self) -> usize {
        self.fragments
            .iter()
            .filter_map(TextFragment::body)
            .map(|text| text.chars().filter(|c| !c.is_whitespace()).count())
            .sum()
    }

    /// Flatten into the annotated text consumed by the inferencers.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            fragment.render_into(&mut out);
        }
        out
    }
}

impl fmt::Display for ExtractedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
