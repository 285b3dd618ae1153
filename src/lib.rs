//! Weekly learning-time aggregation and reporting engine.
//!
//! Normalizes hand-edited study sheets, bins records into calendar weeks,
//! computes per-variable means, compares actuals against per-student
//! goals, ranks students by weekly study time, and generates rule-based
//! status comments.

pub mod aggregate;
pub mod columns;
pub mod error;
pub mod fetch;
pub mod goals;
pub mod ingest;
pub mod output;
pub mod parser;
pub mod ranking;
pub mod report;
pub mod roster;
pub mod sheets;
pub mod snapshot;
pub mod summary;
pub mod weeks;
