//! Server-side record service: CRUD, approval transitions, and uploads
//!
//! The transport is an external collaborator; this trait is the seam the
//! pipelines talk through. Permission is a boolean capability input carried
//! on the actor context, not computed here.

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::record::{PendingFile, Record};

/// Who is editing, and whether they may submit changes
#[derive(Debug, Clone)]
pub struct ActorContext {
    pub user_id: String,
    pub can_edit: bool,
}

impl ActorContext {
    pub fn new(user_id: impl Into<String>, can_edit: bool) -> Self {
        Self {
            user_id: user_id.into(),
            can_edit,
        }
    }
}

/// The three attachment categories, uploaded independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentCategory {
    PropertyImages,
    LocationImages,
    Documents,
}

impl AttachmentCategory {
    pub const ALL: [AttachmentCategory; 3] = [
        AttachmentCategory::PropertyImages,
        AttachmentCategory::LocationImages,
        AttachmentCategory::Documents,
    ];

    /// Wire name used in upload calls and cache keys
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentCategory::PropertyImages => "propertyImages",
            AttachmentCategory::LocationImages => "locationImages",
            AttachmentCategory::Documents => "documents",
        }
    }
}

impl std::fmt::Display for AttachmentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approval transition outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    Approved,
    Rejected,
}

impl DecisionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionOutcome::Approved => "approved",
            DecisionOutcome::Rejected => "rejected",
        }
    }
}

/// Result entry of a completed upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub url: String,
    pub file_name: String,
    pub size: u64,
}

/// Server interface for valuation records
///
/// The server may rewrite `status` and timestamps on save; callers must
/// adopt the returned record as authoritative.
#[allow(async_fn_in_trait)]
pub trait RecordService {
    async fn fetch(&self, record_id: &str, actor: &ActorContext) -> Result<Record, ServiceError>;

    async fn save(
        &self,
        record_id: &str,
        record: &Record,
        actor: &ActorContext,
    ) -> Result<Record, ServiceError>;

    async fn decide(
        &self,
        record_id: &str,
        outcome: DecisionOutcome,
        feedback: &str,
        actor: &ActorContext,
    ) -> Result<Record, ServiceError>;

    /// Upload pending local files for one category; called only when the
    /// category actually has pending entries
    async fn upload(
        &self,
        category: AttachmentCategory,
        files: Vec<PendingFile>,
        record_id: &str,
    ) -> Result<Vec<UploadedFile>, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_wire_names() {
        assert_eq!(AttachmentCategory::PropertyImages.as_str(), "propertyImages");
        assert_eq!(AttachmentCategory::LocationImages.as_str(), "locationImages");
        assert_eq!(AttachmentCategory::Documents.as_str(), "documents");
    }

    #[test]
    fn test_decision_wire_names() {
        assert_eq!(DecisionOutcome::Approved.as_str(), "approved");
        assert_eq!(DecisionOutcome::Rejected.as_str(), "rejected");
    }
}
