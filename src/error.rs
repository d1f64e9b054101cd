//! Error taxonomy for the load and save pipelines
//!
//! Validation problems aggregate into one error so the operator sees every
//! violation at once. Cache-parse problems never surface here; they are
//! logged and treated as a cache miss. Derivation formulas never error at
//! all; invalid numeric input degrades to zero or empty output.

use thiserror::Error;

use crate::persist::AttachmentCategory;

/// Opaque failure reported by the record service transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ServiceError(pub String);

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Failure modes of the load and save pipelines
///
/// Nothing is silently retried; every failure is surfaced to the caller for
/// user-facing display, and the in-memory record is left untouched.
#[derive(Debug, Error)]
pub enum ValuationError {
    /// User-correctable violations, aggregated; blocks the save
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Server/network failure while loading the record
    #[error("failed to fetch record: {0}")]
    Fetch(#[source] ServiceError),

    /// An attachment category failed to upload; the whole save is aborted
    #[error("upload failed for {category}: {source}")]
    Upload {
        category: AttachmentCategory,
        source: ServiceError,
    },

    /// The server rejected the assembled payload
    #[error("server rejected save: {0}")]
    Save(#[source] ServiceError),
}
