//! Combines heuristic and language-model metadata into the final record.

use std::sync::Arc;

use tracing::{debug, info};

use super::ai::MetadataExtractor;
use super::heuristics::HeuristicInferencer;
use crate::config::ExtractionConfig;
use crate::models::{ExtractedText, MetadataRecord};

/// Produces exactly one [`MetadataRecord`] per document.
///
/// The heuristic baseline is always computed. The extractor is consulted
/// only when the body text is substantial enough, and whatever it returns
/// overrides the baseline field by field.
#[derive(Clone)]
pub struct MetadataResolver {
    heuristics: HeuristicInferencer,
    extractor: Option<Arc<dyn MetadataExtractor>>,
    min_body_chars: usize,
}

impl MetadataResolver {
    pub fn new(extractor: Option<Arc<dyn MetadataExtractor>>) -> Self {
        Self {
            heuristics: HeuristicInferencer::new(),
            extractor,
            min_body_chars: ExtractionConfig::default().min_body_chars,
        }
    }

    /// Resolver that never leaves the process.
    pub fn heuristic_only() -> Self {
        Self::new(None)
    }

    pub fn with_min_body_chars(mut self, min_body_chars: usize) -> Self {
        self.min_body_chars = min_body_chars;
        self
    }

    pub async fn resolve(&self, text: &ExtractedText) -> MetadataRecord {
        let mut record = self.heuristics.infer(text);

        let Some(extractor) = &self.extractor else {
            return record;
        };

        let body_chars = text.body_char_count();
        if body_chars <= self.min_body_chars {
            info!(
                "Limited text available ({} characters), using filename analysis only",
                body_chars
            );
            return record;
        }

        let extraction = extractor.extract(text).await;
        let changed = record.apply(&extraction);
        debug!("Model overrode {} of {} offered fields", changed, extraction.len());
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AiExtraction, MetadataField, TextFragment, UNKNOWN};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeExtractor {
        reply: AiExtraction,
        calls: AtomicUsize,
    }

    impl FakeExtractor {
        fn new(fields: &[(MetadataField, &str)]) -> Arc<Self> {
            let mut reply = AiExtraction::new();
            for (field, value) in fields {
                reply.insert(*field, *value);
            }
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl MetadataExtractor for FakeExtractor {
        async fn extract(&self, _text: &ExtractedText) -> AiExtraction {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn document(body: &str) -> ExtractedText {
        let mut text = ExtractedText::new();
        if !body.is_empty() {
            text.push(TextFragment::Page {
                number: 1,
                text: body.to_string(),
            });
        }
        text.push(TextFragment::Filename(
            "Sanskrit_Grammar-Intro_Bhattoji.pdf".to_string(),
        ));
        text.push(TextFragment::PageCount(212));
        text
    }

    #[tokio::test]
    async fn test_model_overrides_heuristics_per_field() {
        let fake = FakeExtractor::new(&[
            (MetadataField::Title, "Siddhanta Kaumudi"),
            (MetadataField::Author, "Bhattoji Dikshita"),
        ]);
        let resolver = MetadataResolver::new(Some(fake.clone()));

        let record = resolver.resolve(&document(&"a".repeat(150))).await;
        assert_eq!(record.get(MetadataField::Title), "Siddhanta Kaumudi");
        assert_eq!(record.get(MetadataField::Author), "Bhattoji Dikshita");
        assert_eq!(record.get(MetadataField::Language), "Sanskrit");
        assert_eq!(record.get(MetadataField::PageCount), "212");
        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_short_body_skips_model() {
        let fake = FakeExtractor::new(&[(MetadataField::Title, "Ignored")]);
        let resolver = MetadataResolver::new(Some(fake.clone()));

        // Exactly at the threshold is not enough.
        let record = resolver.resolve(&document(&"a".repeat(100))).await;
        assert_eq!(record.get(MetadataField::Title), "Grammar Intro");
        assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_whitespace_and_trailers_do_not_count() {
        let fake = FakeExtractor::new(&[(MetadataField::Title, "Ignored")]);
        let resolver = MetadataResolver::new(Some(fake.clone()));

        let body = "a b\n".repeat(50);
        resolver.resolve(&document(&body)).await;
        assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_extraction_keeps_baseline() {
        let fake = FakeExtractor::new(&[]);
        let resolver = MetadataResolver::new(Some(fake));
        let text = document(&"a".repeat(500));

        let record = resolver.resolve(&text).await;
        assert_eq!(record, HeuristicInferencer::new().infer(&text));
    }

    #[tokio::test]
    async fn test_empty_text_is_all_unknown() {
        let resolver = MetadataResolver::heuristic_only();
        let record = resolver.resolve(&ExtractedText::new()).await;
        assert_eq!(record, MetadataRecord::new());
        assert_eq!(record.get(MetadataField::Title), UNKNOWN);
    }

    #[tokio::test]
    async fn test_custom_threshold() {
        let fake = FakeExtractor::new(&[(MetadataField::Year, "1905")]);
        let resolver = MetadataResolver::new(Some(fake.clone())).with_min_body_chars(5);

        let record = resolver.resolve(&document("abcdefg")).await;
        assert_eq!(record.get(MetadataField::Year), "1905");
        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
    }
}
