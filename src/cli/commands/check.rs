//! Environment check command.

use console::style;

use crate::config::Config;
use crate::llm::LlmProvider;
use crate::ocr::{check_tools, OcrBackend, OcrCapability, TesseractBackend};

/// Report external tool availability and LLM configuration.
pub async fn cmd_check(config: &Config) -> anyhow::Result<()> {
    println!("{}", style("External tools:").bold());
    for (tool, available) in check_tools() {
        let mark = if available {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!("  {} {}", mark, tool);
    }

    let ocr = OcrCapability::probe();
    println!(
        "  OCR fallback: {}",
        if !config.extraction.ocr_enabled {
            style("disabled in config").dim()
        } else if ocr.is_available() {
            style("available").green()
        } else {
            style("unavailable").yellow()
        }
    );
    let tesseract = TesseractBackend::new();
    if config.extraction.ocr_enabled && !ocr.is_available() {
        println!("  {}", style(tesseract.availability_hint()).dim());
    }

    let llm = &config.llm;
    println!();
    println!("{}", style("Language model:").bold());
    if !llm.enabled {
        println!("  {}", style("disabled").dim());
        return Ok(());
    }
    let provider = match llm.provider {
        LlmProvider::OpenAI => "openai-compatible",
        LlmProvider::Ollama => "ollama",
    };
    println!("  Provider: {}", provider);
    println!("  Endpoint: {}", llm.endpoint);
    println!("  Model:    {}", llm.model);
    if llm.has_credentials() {
        println!("  {} API key configured", style("✓").green());
    } else {
        println!(
            "  {} No API key (set LLM_API_KEY or MISTRAL_API_KEY)",
            style("✗").red()
        );
    }

    if let Some(ref path) = config.source_path {
        println!();
        println!("Config: {}", path.display());
    }

    Ok(())
}
