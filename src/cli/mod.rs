//! Command-line interface.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "bookmeta")]
#[command(about = "Extract bibliographic metadata from batches of PDF books")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Process every PDF in the input folder and write the exports
    Run {
        /// Folder containing the PDFs (overrides config)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Folder to write pdfs_metadata.csv and pdfs_metadata.json to (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip the language model and use filename analysis only
        #[arg(long)]
        no_llm: bool,
        /// Never fall back to OCR for PDFs without embedded text
        #[arg(long)]
        no_ocr: bool,
    },

    /// Process a single PDF and print its metadata
    Inspect {
        /// PDF file to inspect
        file: PathBuf,
        /// Also print the acquired text
        #[arg(long)]
        show_text: bool,
        /// Skip the language model and use filename analysis only
        #[arg(long)]
        no_llm: bool,
    },

    /// Check availability of external tools and LLM credentials
    Check,
}

/// Load configuration from an explicit path or by discovery.
async fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Ok(Config::load_from_path(path).await?),
        None => Ok(Config::load().await),
    }
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref()).await?;

    match cli.command {
        Commands::Run {
            input,
            output,
            no_llm,
            no_ocr,
        } => {
            if no_llm {
                config.llm.enabled = false;
            }
            if no_ocr {
                config.extraction.ocr_enabled = false;
            }
            commands::cmd_run(&config, input, output).await
        }
        Commands::Inspect {
            file,
            show_text,
            no_llm,
        } => {
            if no_llm {
                config.llm.enabled = false;
            }
            commands::cmd_inspect(&config, &file, show_text).await
        }
        Commands::Check => commands::cmd_check(&config).await,
    }
}
