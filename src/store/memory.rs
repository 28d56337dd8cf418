//! In-memory store implementation for testing and dry runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::StoreError;
use crate::models::{ArticleRecord, ImageRef};
use crate::store::{AttachmentId, ContentStore, RecordId};

/// A record as held by the memory store.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub record: ArticleRecord,
    pub category: Option<String>,
    pub attachments: Vec<ImageRef>,
}

/// In-memory [`ContentStore`].
///
/// Useful for tests and `--dry-run` imports. Data is lost when the
/// process exits.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<u64, StoredRecord>>,
    next_id: RwLock<u64>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records created so far.
    pub fn record_count(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Snapshot of a stored record.
    pub fn get(&self, id: RecordId) -> Option<StoredRecord> {
        self.records.read().unwrap().get(&id.0).cloned()
    }

    /// All stored records in creation order.
    pub fn records(&self) -> Vec<StoredRecord> {
        let guard = self.records.read().unwrap();
        let mut ids: Vec<_> = guard.keys().copied().collect();
        ids.sort_unstable();
        ids.iter().map(|id| guard[id].clone()).collect()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn create_record(&self, record: &ArticleRecord) -> Result<RecordId, StoreError> {
        let mut records = self.records.write().unwrap();
        if records
            .values()
            .any(|stored| stored.record.descriptor.title == record.descriptor.title)
        {
            return Err(StoreError::DuplicateTitle {
                title: record.descriptor.title.clone(),
            });
        }
        let mut next_id = self.next_id.write().unwrap();
        *next_id += 1;
        records.insert(
            *next_id,
            StoredRecord {
                record: record.clone(),
                category: None,
                attachments: Vec::new(),
            },
        );
        Ok(RecordId(*next_id))
    }

    async fn assign_category(&self, id: RecordId, category: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().unwrap();
        let stored = records
            .get_mut(&id.0)
            .ok_or(StoreError::UnknownRecord { id: id.0 })?;
        stored.category = Some(category.to_string());
        Ok(())
    }

    async fn attach_image(
        &self,
        id: RecordId,
        image: &ImageRef,
    ) -> Result<AttachmentId, StoreError> {
        let mut records = self.records.write().unwrap();
        let stored = records
            .get_mut(&id.0)
            .ok_or(StoreError::UnknownRecord { id: id.0 })?;
        stored.attachments.push(image.clone());
        Ok(AttachmentId(stored.attachments.len() as u64))
    }
}
