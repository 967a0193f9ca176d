//! Language-model metadata extraction.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::parse::parse_response;
use crate::llm::{LlmClient, LlmConfig, LlmError};
use crate::models::{AiExtraction, ExtractedText};

/// Produces partial metadata from acquired text.
///
/// Implementations never fail: any problem is logged and surfaces as an
/// empty extraction.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    async fn extract(&self, text: &ExtractedText) -> AiExtraction;
}

/// Extractor backed by a chat-completions style language model.
pub struct AiInferencer {
    client: LlmClient,
}

impl AiInferencer {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        Ok(Self::new(LlmClient::new(config)?))
    }

    /// Prompt sent for a document, holding at most the configured number of
    /// leading characters of its text.
    pub fn build_prompt(&self, text: &ExtractedText) -> String {
        self.client.metadata_prompt(&text.render())
    }

    pub async fn infer(&self, text: &ExtractedText) -> AiExtraction {
        let prompt = self.build_prompt(text);

        let reply = match self.client.complete(&prompt).await {
            Ok(reply) => reply,
            Err(LlmError::MissingApiKey) => {
                warn!("No API key configured, skipping language-model extraction");
                return AiExtraction::new();
            }
            Err(e) => {
                warn!("Language-model request failed: {}", e);
                return AiExtraction::new();
            }
        };
        debug!("Model reply: {}", reply);

        match parse_response(&reply) {
            Ok(extraction) => {
                info!("Language model supplied {} fields", extraction.len());
                extraction
            }
            Err(e) => {
                warn!("Could not parse model reply: {}", e);
                AiExtraction::new()
            }
        }
    }
}

#[async_trait]
impl MetadataExtractor for AiInferencer {
    async fn extract(&self, text: &ExtractedText) -> AiExtraction {
        self.infer(text).await
    }
}
