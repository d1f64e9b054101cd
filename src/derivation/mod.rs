//! Field derivation: formula groups and the engine that applies them

pub mod engine;
pub mod groups;

pub use engine::{apply_field_edit, recompute_totals};
