//! JSON-file store: one file per imported record.
//!
//! # Output Structure
//!
//! Files land flat under the output directory, named by record id and
//! title slug:
//!
//! ```text
//! output_dir/
//! ├── 0001-berita-satu.json
//! ├── 0002-berita-dua.json
//! └── ...
//! ```
//!
//! Category assignment and image attachment rewrite the record's file in
//! place. Duplicate titles are tracked for the lifetime of the store, so
//! re-running an import against the same directory within one process
//! skips already-imported titles.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::{ArticleRecord, ImageRef};
use crate::store::{AttachmentId, ContentStore, RecordId};
use crate::utils::slugify_title;

/// The on-disk shape of one imported record.
#[derive(Debug, Clone, serde::Serialize)]
struct RecordFile {
    id: u64,
    record: ArticleRecord,
    category: Option<String>,
    attachments: Vec<ImageRef>,
}

#[derive(Default)]
struct State {
    next_id: u64,
    records: HashMap<u64, (PathBuf, RecordFile)>,
}

/// [`ContentStore`] that writes each record as a JSON file.
pub struct JsonDirStore {
    root: PathBuf,
    state: Mutex<State>,
}

impl JsonDirStore {
    /// Create a store rooted at `root`. The directory itself must already
    /// exist (the driver probes it at startup).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            state: Mutex::new(State::default()),
        }
    }

    async fn persist(path: &Path, file: &RecordFile) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(file)?;
        fs::write(path, json).await?;
        debug!(path = %path.display(), "Wrote record file");
        Ok(())
    }
}

#[async_trait]
impl ContentStore for JsonDirStore {
    async fn create_record(&self, record: &ArticleRecord) -> Result<RecordId, StoreError> {
        let mut state = self.state.lock().await;
        if state
            .records
            .values()
            .any(|(_, existing)| existing.record.descriptor.title == record.descriptor.title)
        {
            return Err(StoreError::DuplicateTitle {
                title: record.descriptor.title.clone(),
            });
        }

        let id = state.next_id + 1;
        let slug = slugify_title(&record.descriptor.title);
        let path = self.root.join(format!("{id:04}-{slug}.json"));
        let file = RecordFile {
            id,
            record: record.clone(),
            category: None,
            attachments: Vec::new(),
        };

        Self::persist(&path, &file).await?;
        state.next_id = id;
        state.records.insert(id, (path.clone(), file));
        info!(id, path = %path.display(), title = %record.descriptor.title, "Created record");
        Ok(RecordId(id))
    }

    async fn assign_category(&self, id: RecordId, category: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let (path, file) = state
            .records
            .get_mut(&id.0)
            .ok_or(StoreError::UnknownRecord { id: id.0 })?;
        file.category = Some(category.to_string());
        let (path, file) = (path.clone(), file.clone());
        Self::persist(&path, &file).await
    }

    async fn attach_image(
        &self,
        id: RecordId,
        image: &ImageRef,
    ) -> Result<AttachmentId, StoreError> {
        let mut state = self.state.lock().await;
        let (path, file) = state
            .records
            .get_mut(&id.0)
            .ok_or(StoreError::UnknownRecord { id: id.0 })?;
        file.attachments.push(image.clone());
        let attachment = AttachmentId(file.attachments.len() as u64);
        let (path, file) = (path.clone(), file.clone());
        Self::persist(&path, &file).await?;
        Ok(attachment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CleanedContent, PostStatus, SitemapEntry};

    fn record(title: &str) -> ArticleRecord {
        let descriptor = SitemapEntry {
            loc: "https://example.com/daerah/berita-1".to_string(),
            title: title.to_string(),
            publication_date: "2024-01-05T07:30:00+07:00".to_string(),
        }
        .into_descriptor(PostStatus::Publish)
        .unwrap();
        ArticleRecord {
            category: descriptor.category(),
            descriptor,
            content: CleanedContent::new("<p>Isi.</p>".to_string()),
            images: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_creates_one_file_per_record() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(tmp.path());

        store.create_record(&record("Berita Satu")).await.unwrap();
        store.create_record(&record("Berita Dua")).await.unwrap();

        let mut names: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec!["0001-berita-satu.json", "0002-berita-dua.json"]);
    }

    #[tokio::test]
    async fn test_duplicate_title_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(tmp.path());

        store.create_record(&record("Berita Satu")).await.unwrap();
        let err = store.create_record(&record("Berita Satu")).await.unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_updates_rewrite_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(tmp.path());

        let id = store.create_record(&record("Berita Satu")).await.unwrap();
        store.assign_category(id, "daerah").await.unwrap();
        store
            .attach_image(
                id,
                &ImageRef {
                    url: "https://example.com/a.jpg".to_string(),
                    alt: "Foto A".to_string(),
                },
            )
            .await
            .unwrap();

        let text =
            std::fs::read_to_string(tmp.path().join("0001-berita-satu.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["category"], "daerah");
        assert_eq!(value["attachments"][0]["url"], "https://example.com/a.jpg");
        assert_eq!(value["record"]["descriptor"]["title"], "Berita Satu");
        assert_eq!(value["record"]["descriptor"]["status"], "publish");
    }
}
