//! Shared types for the Scout research backend.

mod answer;
mod job;
mod query;

pub use answer::*;
pub use job::*;
pub use query::*;
