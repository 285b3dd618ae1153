//! Core error types for sheet ingestion and week-catalog configuration.
//!
//! Defined as a dedicated enum so batch code can classify per-student
//! failures without string matching. Orchestration code wraps these in
//! `anyhow` at the boundary.

use thiserror::Error;

/// Errors produced by the aggregation core.
#[derive(Debug, Error)]
pub enum StudyError {
    /// The mandatory date column ("일시") is absent from the sheet header.
    /// Fatal for that student's ingestion only.
    #[error("required date column \"일시\" is missing from the sheet header")]
    MissingDateColumn,

    /// The sheet body is empty: a goal row followed by observation rows is
    /// expected.
    #[error("sheet has no body rows (expected a goal row followed by observations)")]
    EmptyTable,

    /// A week-range request where the first label comes after the last in
    /// catalog order. Rejected before any computation.
    #[error("invalid week range: \"{first}\" occurs after \"{last}\" in catalog order")]
    InvalidRange { first: String, last: String },

    /// A week label that does not exist in the active catalog.
    #[error("unknown week label: \"{0}\"")]
    UnknownWeek(String),

    /// A malformed week catalog (unordered or overlapping definitions).
    /// Fatal at startup.
    #[error("invalid week catalog: {0}")]
    CatalogConfig(String),
}

impl StudyError {
    /// Returns `true` if the error only affects a single student's sheet and
    /// must not abort a batch report.
    pub fn is_per_student(&self) -> bool {
        matches!(self, StudyError::MissingDateColumn | StudyError::EmptyTable)
    }
}
