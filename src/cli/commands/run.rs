//! Batch run command.

use std::path::PathBuf;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use crate::config::Config;
use crate::export::export_all;
use crate::models::MetadataField;
use crate::ocr::OcrCapability;
use crate::services::{discover_documents, BatchEvent, BatchOrchestrator, DocumentProcessor};

/// Rows shown in the closing summary.
const PREVIEW_ROWS: usize = 5;

/// Process every PDF in the input folder and write the exports.
pub async fn cmd_run(
    config: &Config,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let input_dir = input.unwrap_or_else(|| config.input_path());
    let output_dir = output.unwrap_or_else(|| config.output_path());

    let documents = discover_documents(&input_dir)?;
    println!(
        "{} Found {} PDFs in {}",
        style("→").cyan(),
        documents.len(),
        input_dir.display()
    );

    let capability = if config.extraction.ocr_enabled {
        OcrCapability::probe()
    } else {
        OcrCapability::disabled()
    };
    if config.extraction.ocr_enabled && !capability.is_available() {
        println!(
            "{} OCR unavailable (install poppler-utils and tesseract-ocr); scanned PDFs will use filename analysis only",
            style("!").yellow()
        );
    }

    let orchestrator = BatchOrchestrator::new(DocumentProcessor::from_config(config, capability));

    // Create event channel for progress tracking
    let (event_tx, mut event_rx) = mpsc::channel::<BatchEvent>(100);

    // Spawn event handler for UI
    let event_handler = tokio::spawn(async move {
        let mut progress: Option<ProgressBar> = None;
        while let Some(event) = event_rx.recv().await {
            match event {
                BatchEvent::Started { total_documents } => {
                    let pb = ProgressBar::new(total_documents as u64);
                    pb.set_style(
                        ProgressStyle::default_bar()
                            .template(
                                "{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}",
                            )
                            .unwrap_or_else(|_| ProgressStyle::default_bar())
                            .progress_chars("█▓░"),
                    );
                    progress = Some(pb);
                }
                BatchEvent::DocumentStarted { filename } => {
                    if let Some(ref pb) = progress {
                        pb.set_message(filename);
                    }
                }
                BatchEvent::DocumentCompleted { .. } => {
                    if let Some(ref pb) = progress {
                        pb.inc(1);
                    }
                }
                BatchEvent::DocumentFailed { filename, error } => {
                    if let Some(ref pb) = progress {
                        pb.println(format!("  {} {}: {}", style("✗").red(), filename, error));
                        pb.inc(1);
                    }
                }
                BatchEvent::Complete { .. } => {
                    if let Some(pb) = progress.take() {
                        pb.finish_and_clear();
                    }
                }
            }
        }
    });

    let result = orchestrator.run(&documents, event_tx).await;
    event_handler.await?;

    let records = result.records();
    let paths = export_all(&records, &output_dir)?;

    println!(
        "{} Processed {} PDFs ({} failed)",
        style("✓").green(),
        records.len(),
        result.failed
    );
    println!("  CSV:   {}", paths.csv.display());
    println!("  Excel: {}", paths.xlsx.display());
    println!("  JSON:  {}", paths.json.display());

    println!();
    println!("{}", style("Preview:").bold());
    for record in records.iter().take(PREVIEW_ROWS) {
        println!(
            "  {} | {} | {}",
            record.get(MetadataField::Title),
            record.get(MetadataField::Author),
            record.get(MetadataField::Publisher)
        );
    }

    Ok(())
}
