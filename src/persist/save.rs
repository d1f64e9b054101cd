//! Save pipeline: validate, assemble, upload, submit
//!
//! The pipeline never mutates the caller's record; it works on a structural
//! clone and returns the server's authoritative response. Any failure along
//! the way aborts the whole save and surfaces one error.

use crate::error::ValuationError;
use crate::persist::kv::{CacheKey, KeyValueStore};
use crate::persist::service::{
    ActorContext, AttachmentCategory, DecisionOutcome, RecordService, UploadedFile,
};
use crate::record::fields::{
    COORDINATE_RANGES, PAYMENT_COLLECTOR_FIELD, PAYMENT_FLAG_FIELD, REQUIRED_FIELDS,
};
use crate::record::{Attachment, PendingFile, Record, Tab};

/// Validate the record ahead of a save
///
/// Violations aggregate so the operator sees all of them at once; any
/// violation blocks the save entirely.
pub fn validate(record: &Record) -> Result<(), Vec<String>> {
    let mut violations = Vec::new();

    for field in REQUIRED_FIELDS {
        if !record.is_set(field) {
            violations.push(format!("{} is required", field));
        }
    }

    for (field, min, max) in COORDINATE_RANGES.iter().copied() {
        if !record.is_set(field) {
            continue;
        }
        match record.text(field).trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value >= min && value <= max => {}
            _ => violations.push(format!("{} must be between {} and {}", field, min, max)),
        }
    }

    if record.flag(PAYMENT_FLAG_FIELD) && !record.is_set(PAYMENT_COLLECTOR_FIELD) {
        violations.push(format!(
            "{} is required when payment is collected",
            PAYMENT_COLLECTOR_FIELD
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Assemble the outbound payload from the in-memory record
///
/// The clone is structural, so the dynamic collections come along typed;
/// they are still re-attached explicitly from the live record so no later
/// assembly step can revert them to an earlier snapshot.
fn assemble_payload(record: &Record) -> Record {
    let mut payload = record.clone();
    payload.custom_fields = record.custom_fields.clone();
    payload.custom_extent_fields = record.custom_extent_fields.clone();
    payload.custom_balcony_fields = record.custom_balcony_fields.clone();
    payload.custom_cost_fields = record.custom_cost_fields.clone();
    payload.custom_built_up_fields = record.custom_built_up_fields.clone();
    payload
}

/// Split a category into already-persisted entries and files still needing
/// an upload
fn partition(attachments: &[Attachment]) -> (Vec<Attachment>, Vec<PendingFile>) {
    let mut persisted = Vec::new();
    let mut pending = Vec::new();
    for attachment in attachments {
        if let Some(file) = &attachment.pending {
            pending.push(file.clone());
        } else if attachment.url.is_some() {
            persisted.push(attachment.clone());
        }
    }
    (persisted, pending)
}

fn merge_uploaded(persisted: Vec<Attachment>, uploaded: Vec<UploadedFile>) -> Vec<Attachment> {
    let mut merged = persisted;
    merged.extend(
        uploaded
            .into_iter()
            .map(|file| Attachment::persisted(file.url, file.file_name, file.size)),
    );
    merged
}

/// Coordinates validation, uploads, submission, and cache bookkeeping
pub struct SavePipeline<'a, S, K> {
    service: &'a S,
    store: &'a K,
    actor: ActorContext,
}

impl<'a, S: RecordService, K: KeyValueStore> SavePipeline<'a, S, K> {
    pub fn new(service: &'a S, store: &'a K, actor: ActorContext) -> Self {
        Self {
            service,
            store,
            actor,
        }
    }

    /// Submit the record
    ///
    /// The three attachment categories upload concurrently; all of them must
    /// finish before the payload is built and submitted. On success the tab
    /// caches and draft are superseded and cleared, and the saved record
    /// becomes the editor's new prefill template.
    pub async fn submit(&self, record: &Record) -> Result<Record, ValuationError> {
        validate(record).map_err(ValuationError::Validation)?;

        let record_id = record.id.clone().unwrap_or_default();

        let (property_done, property_pending) = partition(&record.property_images);
        let (location_done, location_pending) = partition(&record.location_images);
        let (documents_done, documents_pending) = partition(&record.documents);

        let (property_new, location_new, documents_new) = tokio::try_join!(
            self.upload_category(AttachmentCategory::PropertyImages, property_pending, &record_id),
            self.upload_category(AttachmentCategory::LocationImages, location_pending, &record_id),
            self.upload_category(AttachmentCategory::Documents, documents_pending, &record_id),
        )?;

        let mut payload = assemble_payload(record);
        payload.property_images = merge_uploaded(property_done, property_new);
        payload.location_images = merge_uploaded(location_done, location_new);
        payload.documents = merge_uploaded(documents_done, documents_new);

        let saved = self
            .service
            .save(&record_id, &payload, &self.actor)
            .await
            .map_err(ValuationError::Save)?;

        // The unsent edits are now part of the server copy
        for tab in Tab::ALL {
            self.store.remove(&CacheKey::tab(tab, &record_id)).await;
        }
        self.store
            .remove(&CacheKey::draft(&self.actor.user_id, &record_id))
            .await;
        if let Ok(json) = serde_json::to_string(&saved) {
            self.store
                .set(&CacheKey::prefill(&self.actor.user_id), &json)
                .await;
        }

        log::info!(
            "record {} saved with status {:?}",
            record_id,
            saved.status.as_deref()
        );
        Ok(saved)
    }

    /// Run an approval transition and adopt the server's response
    pub async fn decide(
        &self,
        record_id: &str,
        outcome: DecisionOutcome,
        feedback: &str,
    ) -> Result<Record, ValuationError> {
        self.service
            .decide(record_id, outcome, feedback, &self.actor)
            .await
            .map_err(ValuationError::Save)
    }

    async fn upload_category(
        &self,
        category: AttachmentCategory,
        pending: Vec<PendingFile>,
        record_id: &str,
    ) -> Result<Vec<UploadedFile>, ValuationError> {
        if pending.is_empty() {
            return Ok(Vec::new());
        }
        self.service
            .upload(category, pending, record_id)
            .await
            .map_err(|source| ValuationError::Upload { category, source })
    }
}
