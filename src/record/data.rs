//! The canonical in-memory valuation record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::formulas::parse_amount;

/// A scalar field value as it travels on the wire: free text (numbers are
/// carried as strings) or a real boolean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
}

impl FieldValue {
    /// Numeric view of the value; non-numeric text degrades to 0
    pub fn as_number(&self) -> f64 {
        match self {
            FieldValue::Text(text) => parse_amount(text),
            FieldValue::Bool(_) => 0.0,
        }
    }

    /// Boolean view: real booleans pass through, the literal string "true"
    /// counts, anything else is false
    pub fn as_bool(&self) -> bool {
        match self {
            FieldValue::Bool(flag) => *flag,
            FieldValue::Text(text) => text == "true",
        }
    }

    /// Text view of the value
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(text) => text,
            FieldValue::Bool(true) => "true",
            FieldValue::Bool(false) => "false",
        }
    }

    /// A value is empty when it carries no text; booleans are never empty
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Bool(_) => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Text(text)
    }
}

impl From<bool> for FieldValue {
    fn from(flag: bool) -> Self {
        FieldValue::Bool(flag)
    }
}

/// Free-form named key/value pair added by the operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedField {
    pub id: String,
    pub name: String,
    pub value: String,
}

/// Dynamic floor/area row with a sqm/sqft conversion pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaRow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sqm: String,
    #[serde(default)]
    pub sqft: String,
}

/// Dynamic cost row: `value = sqft * rate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostRow {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub sqft: String,
    #[serde(default)]
    pub rate: String,
    #[serde(default)]
    pub value: String,
}

/// A file attached to the record: either already persisted (has a URL) or
/// still pending upload (carries the local file)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(default)]
    pub url: Option<String>,
    pub file_name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(skip)]
    pub pending: Option<PendingFile>,
}

impl Attachment {
    /// Preview entry for a file the server already holds
    pub fn persisted(url: impl Into<String>, file_name: impl Into<String>, size: u64) -> Self {
        Self {
            url: Some(url.into()),
            file_name: file_name.into(),
            size,
            pending: None,
        }
    }

    /// Entry for a freshly selected local file awaiting upload
    pub fn pending(file: PendingFile) -> Self {
        Self {
            url: None,
            file_name: file.file_name.clone(),
            size: file.content.len() as u64,
            pending: Some(file),
        }
    }
}

/// Local file contents queued for upload; never serialized with the record
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

/// The full valuation document being edited
///
/// Fixed-schema scalars live in `fields` keyed by their wire names; the five
/// dynamic collections and the three attachment lists are typed. Cloning a
/// `Record` is a structural deep copy, so merged records never alias.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Record {
    pub id: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>,

    pub custom_fields: Vec<NamedField>,
    pub custom_extent_fields: Vec<AreaRow>,
    pub custom_balcony_fields: Vec<AreaRow>,
    pub custom_cost_fields: Vec<CostRow>,
    pub custom_built_up_fields: Vec<CostRow>,

    pub property_images: Vec<Attachment>,
    pub location_images: Vec<Attachment>,
    pub documents: Vec<Attachment>,

    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Empty scaffold record, used for new forms and as the fetch-failure
    /// fallback so the editor stays usable
    pub fn scaffold(id: Option<&str>) -> Self {
        Self {
            id: id.map(str::to_owned),
            ..Self::default()
        }
    }

    /// Look up a scalar field
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Assign a scalar field
    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.fields.insert(field.to_owned(), value.into());
    }

    /// Numeric view of a scalar field; unset or non-numeric is 0
    pub fn number(&self, field: &str) -> f64 {
        self.get(field).map_or(0.0, FieldValue::as_number)
    }

    /// Text view of a scalar field; unset is the empty string
    pub fn text(&self, field: &str) -> &str {
        self.get(field).map_or("", FieldValue::as_text)
    }

    /// Boolean view of a scalar field; unset is false
    pub fn flag(&self, field: &str) -> bool {
        self.get(field).is_some_and(FieldValue::as_bool)
    }

    /// Whether a scalar field carries a usable value
    pub fn is_set(&self, field: &str) -> bool {
        self.get(field).is_some_and(|value| !value.is_empty())
    }
}
