//! Single-document inspection command.

use std::path::Path;

use console::style;

use crate::config::Config;
use crate::models::DocumentHandle;
use crate::ocr::OcrCapability;
use crate::services::DocumentProcessor;

/// Process one PDF and print its record.
pub async fn cmd_inspect(config: &Config, file: &Path, show_text: bool) -> anyhow::Result<()> {
    if !file.exists() {
        println!("{} File not found: {}", style("!").yellow(), file.display());
    }

    let capability = if config.extraction.ocr_enabled {
        OcrCapability::probe()
    } else {
        OcrCapability::disabled()
    };
    let processor = DocumentProcessor::from_config(config, capability);
    let document = DocumentHandle::new(file);

    let text = processor.acquire(&document).await;
    if show_text {
        println!("{}", style("Acquired text:").bold());
        if text.is_empty() {
            println!("  {}", style("(none)").dim());
        } else {
            println!("{}", text);
        }
        println!();
    }

    let record = processor.resolve(&text).await;
    println!("{} {}", style("Metadata for").bold(), document.filename());
    for (field, value) in record.iter() {
        println!("  {:<20} {}", format!("{}:", field), value);
    }

    Ok(())
}
