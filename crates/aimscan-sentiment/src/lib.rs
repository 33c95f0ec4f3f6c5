//! Sentiment annotation of extracted report paragraphs.
//!
//! Rows are serialized into numbered request lines, sent in sequential
//! batches to a [`CompletionBackend`], and the free-text responses are
//! parsed back into per-row columns with documented defaults for anything
//! the response omits.

pub mod annotate;
pub mod backend;
pub mod batch;
pub mod mock;
pub mod openai;
pub mod parse;
pub mod prompt;

pub use annotate::{AnnotateOptions, annotate_records};
pub use backend::CompletionBackend;
pub use batch::{BatchEvent, DEFAULT_BATCH_SIZE, DEFAULT_REQUEST_TIMEOUT, batch_count};
pub use openai::{DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAiBackend};
pub use parse::{ParsedAnalysis, parse_analysis};
pub use prompt::{SYSTEM_PROMPT, prepare_rows};
