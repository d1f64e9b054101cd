//! Four-tier load reconciliation
//!
//! On load, up to four overlapping sources describe the record: an unsent
//! draft, the authoritative server copy, the editor's prefill template, and
//! the per-tab unsent-edit caches. `resolve` is the single place the merge
//! precedence lives; the async `RecordLoader` only gathers the sources and
//! hands them over.

use crate::derivation;
use crate::error::ServiceError;
use crate::persist::kv::{CacheKey, KeyValueStore};
use crate::persist::service::{ActorContext, AttachmentCategory, RecordService};
use crate::record::fields::{BOOL_FIELDS, PREFILL_GROUPS};
use crate::record::{Attachment, FieldValue, Record, Tab};

/// The four precedence tiers considered during a load
#[derive(Debug, Default)]
pub struct LoadSources {
    /// Unsent draft; when its id matches the requested record it is used
    /// verbatim and the server is never queried
    pub draft: Option<Record>,
    /// Authoritative server copy
    pub server: Option<Record>,
    /// Most recently submitted record by this editor
    pub prefill: Option<Record>,
    /// Per-tab unsent edits, in declared tab order
    pub tab_caches: Vec<(Tab, Record)>,
}

/// Result of a load: the merged record plus the flags callers need
#[derive(Debug)]
pub struct LoadedRecord {
    pub record: Record,
    /// Computed once at load time: the baseline had no named fields
    pub is_new: bool,
    /// Set when the server fetch failed and the scaffold fallback was used
    pub fetch_error: Option<ServiceError>,
}

/// Merge the four sources into one record
///
/// `current` is the in-memory record at the time of the load; its non-empty
/// dynamic collections survive every incoming source so a background refresh
/// can never clobber unsaved multi-row edits.
pub fn resolve(current: &Record, sources: &LoadSources) -> (Record, bool) {
    let mut merged = current.clone();

    let is_new = match &sources.draft {
        Some(_) => false,
        None => sources
            .server
            .as_ref()
            .is_none_or(|server| server.custom_fields.is_empty()),
    };

    if let Some(baseline) = sources.draft.as_ref().or(sources.server.as_ref()) {
        merge_scalars(&mut merged, baseline);
        merge_collections(&mut merged, baseline);
    }

    if sources.draft.is_none() && is_new {
        if let Some(template) = &sources.prefill {
            apply_prefill(&mut merged, template);
        }
    }

    for (_tab, cache) in &sources.tab_caches {
        merge_scalars(&mut merged, cache);
        merge_collections(&mut merged, cache);
    }

    (merged, is_new)
}

/// Copy every defined scalar from `source`, normalizing boolean-typed fields
///
/// A field is defined when it is present and non-empty; empty values never
/// overwrite. Boolean fields accept real booleans and the literal strings
/// "true"/"false"; anything else normalizes to false.
fn merge_scalars(target: &mut Record, source: &Record) {
    for (name, value) in &source.fields {
        if value.is_empty() {
            continue;
        }
        if BOOL_FIELDS.contains(&name.as_str()) {
            target.set(name, value.as_bool());
        } else {
            target.fields.insert(name.clone(), value.clone());
        }
    }
    if source.id.is_some() {
        target.id.clone_from(&source.id);
    }
    if source.status.is_some() {
        target.status.clone_from(&source.status);
    }
    if source.created_at.is_some() {
        target.created_at = source.created_at;
    }
    if source.updated_at.is_some() {
        target.updated_at = source.updated_at;
    }
    if source.submitted_at.is_some() {
        target.submitted_at = source.submitted_at;
    }
}

/// Collection merge rule: a non-empty in-memory collection wins over any
/// incoming version; only an empty collection is replaced
fn merge_collections(target: &mut Record, source: &Record) {
    if target.custom_fields.is_empty() && !source.custom_fields.is_empty() {
        target.custom_fields = source.custom_fields.clone();
    }
    if target.custom_extent_fields.is_empty() && !source.custom_extent_fields.is_empty() {
        target.custom_extent_fields = source.custom_extent_fields.clone();
    }
    if target.custom_balcony_fields.is_empty() && !source.custom_balcony_fields.is_empty() {
        target.custom_balcony_fields = source.custom_balcony_fields.clone();
    }
    if target.custom_cost_fields.is_empty() && !source.custom_cost_fields.is_empty() {
        target.custom_cost_fields = source.custom_cost_fields.clone();
    }
    if target.custom_built_up_fields.is_empty() && !source.custom_built_up_fields.is_empty() {
        target.custom_built_up_fields = source.custom_built_up_fields.clone();
    }
    if target.property_images.is_empty() && !source.property_images.is_empty() {
        target.property_images = source.property_images.clone();
    }
    if target.location_images.is_empty() && !source.location_images.is_empty() {
        target.location_images = source.location_images.clone();
    }
    if target.documents.is_empty() && !source.documents.is_empty() {
        target.documents = source.documents.clone();
    }
}

/// Copy template values into a new record: only the four curated groups, and
/// only into fields not already carrying a value
fn apply_prefill(target: &mut Record, template: &Record) {
    for group in PREFILL_GROUPS {
        for field in group {
            if target.is_set(field) {
                continue;
            }
            if let Some(value) = template.get(field) {
                if value.is_empty() {
                    continue;
                }
                if BOOL_FIELDS.contains(field) {
                    target.set(field, value.as_bool());
                } else {
                    target.set(field, FieldValue::clone(value));
                }
            }
        }
    }
}

/// Gathers the four sources and runs the resolver
pub struct RecordLoader<'a, S, K> {
    service: &'a S,
    store: &'a K,
    actor: ActorContext,
}

impl<'a, S: RecordService, K: KeyValueStore> RecordLoader<'a, S, K> {
    pub fn new(service: &'a S, store: &'a K, actor: ActorContext) -> Self {
        Self {
            service,
            store,
            actor,
        }
    }

    /// Load a record starting from an empty scaffold
    pub async fn load(&self, record_id: &str) -> LoadedRecord {
        self.load_with_current(record_id, &Record::scaffold(Some(record_id)))
            .await
    }

    /// Load a record, preserving the given in-memory state's unsaved
    /// dynamic collections (background refresh)
    pub async fn load_with_current(&self, record_id: &str, current: &Record) -> LoadedRecord {
        let draft = self
            .read_cached_record(&CacheKey::draft(&self.actor.user_id, record_id))
            .await
            .filter(|draft| draft.id.as_deref() == Some(record_id));

        let mut fetch_error = None;
        let server = if draft.is_some() {
            None
        } else {
            match self.service.fetch(record_id, &self.actor).await {
                Ok(record) => Some(record),
                Err(err) => {
                    log::warn!("fetch failed for record {}: {}", record_id, err);
                    fetch_error = Some(err);
                    None
                }
            }
        };

        let prefill = if draft.is_none() {
            self.read_cached_record(&CacheKey::prefill(&self.actor.user_id))
                .await
        } else {
            None
        };

        let mut tab_caches = Vec::new();
        for tab in Tab::ALL {
            if let Some(cache) = self
                .read_cached_record(&CacheKey::tab(tab, record_id))
                .await
            {
                tab_caches.push((tab, cache));
            }
        }

        let sources = LoadSources {
            draft,
            server,
            prefill,
            tab_caches,
        };
        let (mut record, is_new) = resolve(current, &sources);
        self.apply_preview_caches(&mut record, record_id).await;
        derivation::recompute_totals(&mut record);

        LoadedRecord {
            record,
            is_new,
            fetch_error,
        }
    }

    /// Persist the whole record as an unsent draft (fire-and-forget)
    pub async fn store_draft(&self, record: &Record) {
        let Some(record_id) = record.id.as_deref() else {
            return;
        };
        if let Ok(json) = serde_json::to_string(record) {
            self.store
                .set(&CacheKey::draft(&self.actor.user_id, record_id), &json)
                .await;
        }
    }

    /// Drop the unsent draft for a record
    pub async fn clear_draft(&self, record_id: &str) {
        self.store
            .remove(&CacheKey::draft(&self.actor.user_id, record_id))
            .await;
    }

    /// Persist one tab's unsent edits (fire-and-forget)
    pub async fn store_tab_cache(&self, tab: Tab, record_id: &str, edits: &Record) {
        if let Ok(json) = serde_json::to_string(edits) {
            self.store.set(&CacheKey::tab(tab, record_id), &json).await;
        }
    }

    /// Persist a category's attachment previews (fire-and-forget)
    pub async fn store_previews(
        &self,
        category: AttachmentCategory,
        record_id: &str,
        previews: &[Attachment],
    ) {
        if let Ok(json) = serde_json::to_string(previews) {
            self.store
                .set(&CacheKey::previews(category, record_id), &json)
                .await;
        }
    }

    /// Locally cached preview lists take precedence over the server lists;
    /// an absent cache leaves the server entries in place
    async fn apply_preview_caches(&self, record: &mut Record, record_id: &str) {
        for category in AttachmentCategory::ALL {
            let key = CacheKey::previews(category, record_id);
            let Some(raw) = self.store.get(&key).await else {
                continue;
            };
            match serde_json::from_str::<Vec<Attachment>>(&raw) {
                Ok(previews) => match category {
                    AttachmentCategory::PropertyImages => record.property_images = previews,
                    AttachmentCategory::LocationImages => record.location_images = previews,
                    AttachmentCategory::Documents => record.documents = previews,
                },
                Err(err) => {
                    log::warn!("discarding malformed preview cache {}: {}", key, err);
                }
            }
        }
    }

    /// Read and parse a cached record; malformed JSON is a logged miss
    async fn read_cached_record(&self, key: &CacheKey) -> Option<Record> {
        let raw = self.store.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(err) => {
                log::warn!("discarding malformed cache entry {}: {}", key, err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::persist::kv::MemoryKeyValueStore;
    use crate::persist::service::{DecisionOutcome, UploadedFile};
    use crate::record::{NamedField, PendingFile};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockService {
        record: Result<Record, ServiceError>,
        fetch_count: AtomicUsize,
    }

    impl MockService {
        fn returning(record: Record) -> Self {
            Self {
                record: Ok(record),
                fetch_count: AtomicUsize::new(0),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                record: Err(ServiceError::new(message)),
                fetch_count: AtomicUsize::new(0),
            }
        }

        fn fetches(&self) -> usize {
            self.fetch_count.load(Ordering::SeqCst)
        }
    }

    impl RecordService for MockService {
        async fn fetch(&self, _id: &str, _actor: &ActorContext) -> Result<Record, ServiceError> {
            self.fetch_count.fetch_add(1, Ordering::SeqCst);
            self.record.clone()
        }

        async fn save(
            &self,
            _id: &str,
            record: &Record,
            _actor: &ActorContext,
        ) -> Result<Record, ServiceError> {
            Ok(record.clone())
        }

        async fn decide(
            &self,
            _id: &str,
            _outcome: DecisionOutcome,
            _feedback: &str,
            _actor: &ActorContext,
        ) -> Result<Record, ServiceError> {
            self.record.clone()
        }

        async fn upload(
            &self,
            _category: AttachmentCategory,
            _files: Vec<PendingFile>,
            _record_id: &str,
        ) -> Result<Vec<UploadedFile>, ServiceError> {
            Ok(Vec::new())
        }
    }

    fn actor() -> ActorContext {
        ActorContext::new("editor-7", true)
    }

    fn named(name: &str, value: &str) -> NamedField {
        NamedField {
            id: format!("id-{}", name),
            name: name.to_owned(),
            value: value.to_owned(),
        }
    }

    #[test]
    fn test_scalar_merge_only_overwrites_with_defined_values() {
        let mut current = Record::scaffold(Some("rec-1"));
        current.set("place", "Pune");
        current.set("city", "Pune");

        let mut incoming = Record::scaffold(Some("rec-1"));
        incoming.set("place", "");
        incoming.set("city", "Mumbai");

        let sources = LoadSources {
            server: Some(incoming),
            ..Default::default()
        };
        let (merged, _) = resolve(&current, &sources);

        assert_eq!(merged.text("place"), "Pune");
        assert_eq!(merged.text("city"), "Mumbai");
    }

    #[test]
    fn test_boolean_strings_normalize_on_merge() {
        let mut incoming = Record::scaffold(Some("rec-1"));
        incoming.set("paymentCollected", "true");
        incoming.set("isRented", "yes");

        let sources = LoadSources {
            server: Some(incoming),
            ..Default::default()
        };
        let (merged, _) = resolve(&Record::scaffold(Some("rec-1")), &sources);

        assert_eq!(merged.get("paymentCollected"), Some(&FieldValue::Bool(true)));
        assert_eq!(merged.get("isRented"), Some(&FieldValue::Bool(false)));
    }

    #[test]
    fn test_non_empty_local_collection_survives_incoming_source() {
        let mut current = Record::scaffold(Some("rec-1"));
        current.custom_fields.push(named("Facing", "East"));

        let mut incoming = Record::scaffold(Some("rec-1"));
        incoming.custom_fields.push(named("Area", "120"));
        incoming.custom_fields.push(named("Corner", "Yes"));

        let sources = LoadSources {
            server: Some(incoming),
            ..Default::default()
        };
        let (merged, _) = resolve(&current, &sources);

        assert_eq!(merged.custom_fields.len(), 1);
        assert_eq!(merged.custom_fields[0].name, "Facing");
    }

    #[test]
    fn test_prefill_applies_only_to_new_records() {
        let mut template = Record::scaffold(None);
        template.set("place", "Pune");

        // Server record with a named field is not new: no prefill
        let mut seasoned = Record::scaffold(Some("rec-1"));
        seasoned.custom_fields.push(named("Area", "120"));
        let sources = LoadSources {
            server: Some(seasoned),
            prefill: Some(template.clone()),
            ..Default::default()
        };
        let (merged, is_new) = resolve(&Record::scaffold(Some("rec-1")), &sources);
        assert!(!is_new);
        assert_eq!(merged.text("place"), "");

        // Empty named-field collection means new: prefill applies
        let sources = LoadSources {
            server: Some(Record::scaffold(Some("rec-1"))),
            prefill: Some(template),
            ..Default::default()
        };
        let (merged, is_new) = resolve(&Record::scaffold(Some("rec-1")), &sources);
        assert!(is_new);
        assert_eq!(merged.text("place"), "Pune");
    }

    #[test]
    fn test_prefill_never_overwrites_server_values() {
        let mut server = Record::scaffold(Some("rec-1"));
        server.set("place", "Nashik");

        let mut template = Record::scaffold(None);
        template.set("place", "Pune");
        template.set("city", "Pune");
        // Outside the curated groups: never copied
        template.set("applicantName", "A. Kulkarni");

        let sources = LoadSources {
            server: Some(server),
            prefill: Some(template),
            ..Default::default()
        };
        let (merged, _) = resolve(&Record::scaffold(Some("rec-1")), &sources);

        assert_eq!(merged.text("place"), "Nashik");
        assert_eq!(merged.text("city"), "Pune");
        assert_eq!(merged.text("applicantName"), "");
    }

    #[test]
    fn test_tab_caches_override_server_and_template() {
        let mut server = Record::scaffold(Some("rec-1"));
        server.set("place", "Nashik");
        server.set("landRatePerSqft", "900");

        let mut valuation_edits = Record::scaffold(None);
        valuation_edits.set("landRatePerSqft", "1200");

        let sources = LoadSources {
            server: Some(server),
            tab_caches: vec![(Tab::Valuation, valuation_edits)],
            ..Default::default()
        };
        let (merged, _) = resolve(&Record::scaffold(Some("rec-1")), &sources);

        assert_eq!(merged.text("place"), "Nashik");
        assert_eq!(merged.text("landRatePerSqft"), "1200");
    }

    #[tokio::test]
    async fn test_matching_draft_skips_server_fetch() {
        let store = MemoryKeyValueStore::new();
        let mut draft = Record::scaffold(Some("rec-1"));
        draft.set("place", "Draft Town");
        store
            .set(
                &CacheKey::draft("editor-7", "rec-1"),
                &serde_json::to_string(&draft).unwrap(),
            )
            .await;

        let service = MockService::returning(Record::scaffold(Some("rec-1")));
        let loader = RecordLoader::new(&service, &store, actor());
        let loaded = loader.load("rec-1").await;

        assert_eq!(service.fetches(), 0);
        assert_eq!(loaded.record.text("place"), "Draft Town");
        assert!(!loaded.is_new);
    }

    #[tokio::test]
    async fn test_mismatched_draft_falls_through_to_server() {
        let store = MemoryKeyValueStore::new();
        let mut stale = Record::scaffold(Some("rec-other"));
        stale.set("place", "Stale Town");
        store
            .set(
                &CacheKey::draft("editor-7", "rec-1"),
                &serde_json::to_string(&stale).unwrap(),
            )
            .await;

        let mut server = Record::scaffold(Some("rec-1"));
        server.set("place", "Server Town");
        let service = MockService::returning(server);
        let loader = RecordLoader::new(&service, &store, actor());
        let loaded = loader.load("rec-1").await;

        assert_eq!(service.fetches(), 1);
        assert_eq!(loaded.record.text("place"), "Server Town");
    }

    #[tokio::test]
    async fn test_malformed_cache_is_a_miss() {
        let store = MemoryKeyValueStore::new();
        store
            .set(&CacheKey::draft("editor-7", "rec-1"), "{not json")
            .await;

        let mut server = Record::scaffold(Some("rec-1"));
        server.set("place", "Server Town");
        let service = MockService::returning(server);
        let loader = RecordLoader::new(&service, &store, actor());
        let loaded = loader.load("rec-1").await;

        assert_eq!(service.fetches(), 1);
        assert_eq!(loaded.record.text("place"), "Server Town");
    }

    #[tokio::test]
    async fn test_fetch_failure_falls_back_to_scaffold() {
        let store = MemoryKeyValueStore::new();
        let service = MockService::failing("gateway timeout");
        let loader = RecordLoader::new(&service, &store, actor());
        let loaded = loader.load("rec-1").await;

        assert!(loaded.fetch_error.is_some());
        assert_eq!(loaded.record.id.as_deref(), Some("rec-1"));
        assert!(loaded.record.fields.values().all(FieldValue::is_empty));
    }

    #[tokio::test]
    async fn test_end_to_end_prefill_from_template() {
        let store = MemoryKeyValueStore::new();
        let mut template = Record::scaffold(Some("rec-old"));
        template.set("place", "Pune");
        store
            .set(
                &CacheKey::prefill("editor-7"),
                &serde_json::to_string(&template).unwrap(),
            )
            .await;

        // Server returns a record with no named fields: a new form
        let service = MockService::returning(Record::scaffold(Some("rec-1")));
        let loader = RecordLoader::new(&service, &store, actor());
        let loaded = loader.load("rec-1").await;

        assert!(loaded.is_new);
        assert_eq!(loaded.record.text("place"), "Pune");
        assert_eq!(loaded.record.id.as_deref(), Some("rec-1"));
    }

    #[tokio::test]
    async fn test_preview_cache_beats_server_list() {
        let store = MemoryKeyValueStore::new();
        let mut server = Record::scaffold(Some("rec-1"));
        server
            .property_images
            .push(Attachment::persisted("https://files/server.jpg", "server.jpg", 10));

        let local = vec![Attachment::persisted(
            "https://files/local.jpg",
            "local.jpg",
            20,
        )];
        store
            .set(
                &CacheKey::previews(AttachmentCategory::PropertyImages, "rec-1"),
                &serde_json::to_string(&local).unwrap(),
            )
            .await;

        let service = MockService::returning(server);
        let loader = RecordLoader::new(&service, &store, actor());
        let loaded = loader.load("rec-1").await;

        assert_eq!(loaded.record.property_images.len(), 1);
        assert_eq!(loaded.record.property_images[0].file_name, "local.jpg");
    }
}
