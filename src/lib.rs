//! Valuation System - Field-derivation engine and multi-tier persistence
//! reconciliation for property valuation records
//!
//! This library provides:
//! - A typed valuation record with fixed scalars and dynamic collections
//! - Pure unit-conversion, product, aggregation, and rounding formulas
//! - A derivation engine keeping computed fields consistent under any edit order
//! - Collection management for named fields and floor/area/cost rows
//! - Four-tier load reconciliation (draft, server, prefill template, tab caches)
//! - A save pipeline with validation, parallel attachment uploads, and cache
//!   supersession

pub mod derivation;
pub mod error;
pub mod formulas;
pub mod persist;
pub mod record;

// Re-export commonly used types
pub use derivation::{apply_field_edit, recompute_totals};
pub use error::{ServiceError, ValuationError};
pub use persist::{
    ActorContext, AttachmentCategory, CacheKey, DecisionOutcome, KeyValueStore, LoadSources,
    LoadedRecord, MemoryKeyValueStore, RecordLoader, RecordService, SavePipeline, UploadedFile,
};
pub use record::{
    AreaRow, Attachment, CostRow, FieldValue, NamedField, PendingFile, Record, RowCollection, Tab,
};
