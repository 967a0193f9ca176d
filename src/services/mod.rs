//! Service layer for bookmeta business logic.
//!
//! This module contains domain logic separated from UI concerns.
//! Services emit events so the CLI can render progress however it likes.

pub mod batch;

pub use batch::{
    discover_documents, BatchError, BatchEvent, BatchOrchestrator, BatchResult, BatchRow,
    DocumentProcessor,
};
