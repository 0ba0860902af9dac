//! Core storage and synthesis for Scout.
//!
//! Holds the query store, insight sources, answer synthesizers and the
//! compile-job store. The HTTP layer lives in `scout-server`.

mod error;
pub mod jobs;
pub mod source;
mod store;
pub mod synth;

pub use error::{ScoutError, DUPLICATE_RECORD_MESSAGE};
pub use jobs::{run_compile_job, JobStore};
pub use source::{EmptyInsightSource, FixtureInsightSource, InsightSource, SeedSource};
pub use store::{validate_new_insight, validate_text, QueryStore};
pub use synth::{synthesize_within, DigestSynthesizer, LlmConfig, LlmProvider, LlmSynthesizer, Synthesizer};

/// Result type for Scout operations.
pub type Result<T> = std::result::Result<T, ScoutError>;
