//! Persistence: scoped caches, the record service seam, four-tier load
//! reconciliation, and the save pipeline

pub mod kv;
pub mod reconciler;
pub mod save;
pub mod service;

pub use kv::{CacheKey, KeyValueStore, MemoryKeyValueStore};
pub use reconciler::{resolve, LoadSources, LoadedRecord, RecordLoader};
pub use save::{validate, SavePipeline};
pub use service::{
    ActorContext, AttachmentCategory, DecisionOutcome, RecordService, UploadedFile,
};
