//! bookmeta - bibliographic metadata extraction for PDF books.
//!
//! Each document goes through a cascade of text acquisition (embedded text,
//! then OCR) and a two-stage inference: filename heuristics, optionally
//! overridden by a language model's structured reply.

pub mod cli;
pub mod config;
pub mod export;
pub mod llm;
pub mod metadata;
pub mod models;
pub mod ocr;
pub mod services;
