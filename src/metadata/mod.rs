//! Metadata inference.
//!
//! Two stages feed one record: filename and trailer heuristics that always
//! run, and an optional language-model extraction whose fields win over the
//! heuristics when present.

mod ai;
mod heuristics;
mod parse;
mod resolver;

pub use ai::{AiInferencer, MetadataExtractor};
pub use heuristics::HeuristicInferencer;
pub use parse::{parse_response, ResponseParseError};
pub use resolver::MetadataResolver;
