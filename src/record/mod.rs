//! Valuation record data model, field tables, and collection management

mod data;
pub mod collections;
pub mod fields;

pub use collections::RowCollection;
pub use data::{AreaRow, Attachment, CostRow, FieldValue, NamedField, PendingFile, Record};
pub use fields::Tab;
