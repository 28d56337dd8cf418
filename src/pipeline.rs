//! Import orchestration.
//!
//! For each descriptor in a batch: fetch the page, derive the category
//! from the URL path, clean the article content, create the record,
//! assign its category, attach its media-region images. Descriptors are
//! processed strictly sequentially (each fetch, extraction, and store
//! handoff completes before the next descriptor starts), and every
//! per-item problem becomes a message in the batch result instead of an
//! error. Chunking a long descriptor list into batches (and deciding
//! whether to keep going) belongs to the caller.

use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

use crate::extract::{ContentExtractor, ImageExtractor};
use crate::fetch::PageFetch;
use crate::models::{ArticleDescriptor, ArticleRecord, CleanedContent, ImportBatchResult};
use crate::store::ContentStore;

/// The extraction and normalization pipeline.
///
/// Collaborators are injected at construction. There is no ambient
/// client or store, so tests run against canned fetchers and an
/// in-memory store.
pub struct ImportPipeline<F, S> {
    fetcher: F,
    store: S,
    content: ContentExtractor,
    images: ImageExtractor,
}

impl<F, S> ImportPipeline<F, S>
where
    F: PageFetch,
    S: ContentStore,
{
    pub fn new(fetcher: F, store: S, content: ContentExtractor, images: ImageExtractor) -> Self {
        Self {
            fetcher,
            store,
            content,
            images,
        }
    }

    /// Import one batch of descriptors, in order.
    ///
    /// Returns the per-batch aggregate; messages preserve the input
    /// descriptor order. Nothing a single descriptor does (dead link,
    /// missing article region, duplicate title, store failure) aborts
    /// the remainder of the batch.
    #[instrument(level = "info", skip_all, fields(batch_len = descriptors.len()))]
    pub async fn import_batch(&self, descriptors: &[ArticleDescriptor]) -> ImportBatchResult {
        let mut result = ImportBatchResult::default();

        // Sequential by construction: `then` awaits each item before
        // pulling the next, so one batch never holds two fetches open.
        let outcomes: Vec<ItemOutcome> = stream::iter(descriptors)
            .then(|d| self.import_one(d))
            .collect()
            .await;
        for outcome in outcomes {
            match outcome {
                ItemOutcome::Imported { messages } => {
                    result.succeeded += 1;
                    result.messages.extend(messages);
                }
                ItemOutcome::Skipped { notice } => {
                    result.messages.push(notice);
                }
                ItemOutcome::Failed { messages } => {
                    result.failed += 1;
                    result.messages.extend(messages);
                }
            }
        }

        info!(
            succeeded = result.succeeded,
            failed = result.failed,
            messages = result.messages.len(),
            "Batch complete"
        );
        result
    }

    /// Run one descriptor through the fetch, extract, and store sequence.
    #[instrument(level = "debug", skip_all, fields(title = %descriptor.title))]
    async fn import_one(&self, descriptor: &ArticleDescriptor) -> ItemOutcome {
        let mut messages = Vec::new();

        // 1. Fetch. A failure is recovered as an empty body: the record
        // is still created so the headline and category survive.
        let fetched = self.fetcher.fetch(descriptor.location.as_str()).await;
        if let Some(kind) = &fetched.error {
            warn!(url = %descriptor.location, error = %kind, "Fetch failed; importing with empty content");
            messages.push(format!(
                "Failed to fetch \"{}\" ({}): {}",
                descriptor.title, descriptor.location, kind
            ));
        }

        // 2. Category comes from the URL alone, so it survives a failed
        // fetch too.
        let category = descriptor.category();

        // 3–4. Extract content and images from the body, when there is one.
        let (content, images) = match &fetched.body {
            Some(body) => (self.content.extract(body), self.images.extract(body)),
            None => (CleanedContent::empty(), Vec::new()),
        };

        let record = ArticleRecord {
            descriptor: descriptor.clone(),
            content,
            images,
            category: category.clone(),
        };

        // 5. Hand off to the store; a duplicate title is a skip, not a
        // failure.
        let id = match self.store.create_record(&record).await {
            Ok(id) => id,
            Err(e) if e.is_duplicate() => {
                info!(title = %descriptor.title, "Skipping duplicate");
                return ItemOutcome::Skipped {
                    notice: format!(
                        "Import skipped: a record titled \"{}\" already exists.",
                        descriptor.title
                    ),
                };
            }
            Err(e) => {
                warn!(title = %descriptor.title, error = %e, "Store rejected record");
                messages.push(format!(
                    "Failed to create record for \"{}\": {}",
                    descriptor.title, e
                ));
                return ItemOutcome::Failed { messages };
            }
        };
        debug!(%id, title = %descriptor.title, "Created record");

        // 6. Tag the category; unknown categories are created by the
        // store. The record stands even if this fails.
        if !category.is_empty() {
            if let Err(e) = self.store.assign_category(id, &category).await {
                warn!(%id, category, error = %e, "Category assignment failed");
                messages.push(format!(
                    "Record \"{}\": failed to assign category \"{}\": {}",
                    descriptor.title, category, e
                ));
            }
        }

        // 7. Attach images in document order. The store decides which
        // one ends up featured.
        for image in record.images.iter().filter(|img| !img.url.is_empty()) {
            if let Err(e) = self.store.attach_image(id, image).await {
                warn!(%id, url = %image.url, error = %e, "Image attachment failed");
                messages.push(format!(
                    "Record \"{}\": failed to attach image {}: {}",
                    descriptor.title, image.url, e
                ));
            }
        }

        ItemOutcome::Imported { messages }
    }
}

/// Terminal state of one descriptor.
enum ItemOutcome {
    Imported { messages: Vec<String> },
    Skipped { notice: String },
    Failed { messages: Vec<String> },
}
