//! Batch processing service.
//!
//! Enumerates PDFs in a folder, runs each one through acquisition and
//! resolution, and assembles one row per document. Separated from UI
//! concerns - emits events for progress tracking.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::metadata::{AiInferencer, MetadataExtractor, MetadataResolver};
use crate::models::{DocumentHandle, ExtractedText, MetadataField, MetadataRecord};
use crate::ocr::{OcrCapability, OcrFallback, TextAcquirer};

/// Errors that stop a batch before any document is processed.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Input folder not found: {0}")]
    InputNotFound(PathBuf),

    #[error("No PDF files found in {0}")]
    NoPdfs(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Events emitted during batch processing.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Started { total_documents: usize },
    DocumentStarted { filename: String },
    DocumentCompleted { filename: String, title: String },
    /// Processing panicked; the row holds the error record.
    DocumentFailed { filename: String, error: String },
    Complete { processed: usize, failed: usize },
}

/// One output row.
#[derive(Debug, Clone)]
pub struct BatchRow {
    pub document: DocumentHandle,
    pub record: MetadataRecord,
}

/// Result of a batch run.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub rows: Vec<BatchRow>,
    pub failed: usize,
}

impl BatchResult {
    pub fn records(&self) -> Vec<MetadataRecord> {
        self.rows.iter().map(|row| row.record.clone()).collect()
    }
}

/// Send a progress event without waiting for channel capacity.
fn emit(event_tx: &mpsc::Sender<BatchEvent>, event: BatchEvent) {
    if let Err(mpsc::error::TrySendError::Full(event)) = event_tx.try_send(event) {
        debug!("Progress channel full, dropping {:?}", event);
    }
}

/// List the PDFs directly inside `dir`, sorted by path.
pub fn discover_documents(dir: &Path) -> Result<Vec<DocumentHandle>, BatchError> {
    if !dir.is_dir() {
        return Err(BatchError::InputNotFound(dir.to_path_buf()));
    }

    let mut documents = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let document = DocumentHandle::new(path);
        if document.is_pdf() {
            documents.push(document);
        }
    }

    if documents.is_empty() {
        return Err(BatchError::NoPdfs(dir.to_path_buf()));
    }

    documents.sort_by(|a, b| a.path().cmp(b.path()));
    info!("Found {} PDFs in {}", documents.len(), dir.display());
    Ok(documents)
}

/// Acquisition plus resolution for a single document.
pub struct DocumentProcessor {
    acquirer: Arc<TextAcquirer>,
    resolver: MetadataResolver,
}

impl DocumentProcessor {
    pub fn new(acquirer: TextAcquirer, resolver: MetadataResolver) -> Self {
        Self {
            acquirer: Arc::new(acquirer),
            resolver,
        }
    }

    /// Build the full pipeline from configuration.
    ///
    /// The language-model stage is left out when it is disabled, has no
    /// credentials, or its HTTP client cannot be built.
    pub fn from_config(config: &Config, capability: OcrCapability) -> Self {
        let extraction = &config.extraction;
        let capability = if extraction.ocr_enabled {
            capability
        } else {
            OcrCapability::disabled()
        };
        let ocr = OcrFallback::from_config(capability, extraction);
        let acquirer = TextAcquirer::from_config(ocr, extraction);

        let extractor: Option<Arc<dyn MetadataExtractor>> = if !config.llm.enabled {
            info!("Language-model extraction disabled");
            None
        } else if !config.llm.has_credentials() {
            warn!("No LLM API key configured (LLM_API_KEY or MISTRAL_API_KEY); using filename analysis only");
            None
        } else {
            match AiInferencer::from_config(config.llm.clone()) {
                Ok(inferencer) => Some(Arc::new(inferencer)),
                Err(e) => {
                    warn!("Language-model extraction unavailable: {}", e);
                    None
                }
            }
        };

        let resolver =
            MetadataResolver::new(extractor).with_min_body_chars(extraction.min_body_chars);
        Self::new(acquirer, resolver)
    }

    /// Acquire text on the blocking pool.
    pub async fn acquire(&self, document: &DocumentHandle) -> ExtractedText {
        let acquirer = Arc::clone(&self.acquirer);
        let path = document.path().to_path_buf();
        match tokio::task::spawn_blocking(move || acquirer.acquire(&path)).await {
            Ok(text) => text,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                warn!("Text acquisition cancelled for {}: {}", document.filename(), e);
                ExtractedText::new()
            }
        }
    }

    pub async fn process(&self, document: &DocumentHandle) -> MetadataRecord {
        let text = self.acquire(document).await;
        info!(
            "Extracted text length for {}: {} characters",
            document.filename(),
            text.render().chars().count()
        );
        self.resolve(&text).await
    }

    pub async fn resolve(&self, text: &ExtractedText) -> MetadataRecord {
        self.resolver.resolve(text).await
    }
}

/// Runs every document through a [`DocumentProcessor`], one at a time.
pub struct BatchOrchestrator {
    processor: Arc<DocumentProcessor>,
}

impl BatchOrchestrator {
    pub fn new(processor: DocumentProcessor) -> Self {
        Self {
            processor: Arc::new(processor),
        }
    }

    /// Discover PDFs in `dir` and process them.
    pub async fn run_dir(
        &self,
        dir: &Path,
        event_tx: mpsc::Sender<BatchEvent>,
    ) -> Result<BatchResult, BatchError> {
        let documents = discover_documents(dir)?;
        Ok(self.run(&documents, event_tx).await)
    }

    /// Process documents in order, producing exactly one row each.
    ///
    /// A document whose processing panics gets the error record; the batch
    /// carries on with the next one.
    ///
    /// Events are best-effort: they are dropped while the channel is full or
    /// after the receiver is gone, so an idle receiver never stalls the batch.
    pub async fn run(
        &self,
        documents: &[DocumentHandle],
        event_tx: mpsc::Sender<BatchEvent>,
    ) -> BatchResult {
        let mut result = BatchResult::default();

        emit(
            &event_tx,
            BatchEvent::Started {
                total_documents: documents.len(),
            },
        );

        for document in documents {
            let filename = document.filename().to_string();
            emit(
                &event_tx,
                BatchEvent::DocumentStarted {
                    filename: filename.clone(),
                },
            );

            let processor = Arc::clone(&self.processor);
            let task_document = document.clone();
            let outcome =
                tokio::spawn(async move { processor.process(&task_document).await }).await;

            let record = match outcome {
                Ok(record) => {
                    emit(
                        &event_tx,
                        BatchEvent::DocumentCompleted {
                            filename,
                            title: record.get(MetadataField::Title).to_string(),
                        },
                    );
                    record
                }
                Err(e) => {
                    warn!("Error processing {}: {}", document.path().display(), e);
                    result.failed += 1;
                    emit(
                        &event_tx,
                        BatchEvent::DocumentFailed {
                            filename,
                            error: e.to_string(),
                        },
                    );
                    MetadataRecord::error()
                }
            };

            result.rows.push(BatchRow {
                document: document.clone(),
                record,
            });
        }

        emit(
            &event_tx,
            BatchEvent::Complete {
                processed: result.rows.len(),
                failed: result.failed,
            },
        );

        result
    }
}
