//! Content-store collaborators.
//!
//! The pipeline emits finished records to a [`ContentStore`] and owns
//! nothing afterwards: duplicate policy, taxonomy storage, and featured
//! image semantics all belong to the store behind this trait.
//!
//! # Implementations
//!
//! - [`MemoryStore`]: in-process maps, for tests and `--dry-run`
//! - [`JsonDirStore`]: one JSON file per record under an output directory

use async_trait::async_trait;
use serde::Serialize;

use crate::error::StoreError;
use crate::models::{ArticleRecord, ImageRef};

pub mod json_dir;
pub mod memory;

pub use json_dir::JsonDirStore;
pub use memory::MemoryStore;

/// Identifier of a created record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RecordId(pub u64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an attached media asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttachmentId(pub u64);

/// Destination for finished article records.
///
/// All concurrency guarantees live behind this trait: the pipeline treats
/// each call as atomic and holds no lock of its own.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Create a record, or signal a duplicate.
    ///
    /// Title equality (exact string match) is the sole dedup key; a clash
    /// returns [`StoreError::DuplicateTitle`] and must leave the store
    /// untouched.
    async fn create_record(&self, record: &ArticleRecord) -> Result<RecordId, StoreError>;

    /// Assign a category to a record, creating the category if it does
    /// not exist yet.
    async fn assign_category(&self, id: RecordId, category: &str) -> Result<(), StoreError>;

    /// Attach an image as a media asset of the record.
    ///
    /// Called once per image in document order; whether the last one
    /// "wins" as the featured image is this store's policy.
    async fn attach_image(&self, id: RecordId, image: &ImageRef)
        -> Result<AttachmentId, StoreError>;
}
