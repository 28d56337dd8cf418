//! Data models for the import pipeline.
//!
//! This module defines the records that flow forward through the system:
//! - [`SitemapEntry`]: raw strings exactly as read from the sitemap XML
//! - [`ArticleDescriptor`]: a validated entry, ready for import
//! - [`FetchResult`]: outcome of one page fetch
//! - [`CleanedContent`]: sanitized article markup
//! - [`ImageRef`]: one normalized image URL/caption pair
//! - [`ArticleRecord`]: the finished record handed to the store
//! - [`ImportBatchResult`]: per-batch success/failure aggregate
//!
//! Raw entries and validated descriptors are separate types on purpose:
//! the sitemap parser stays permissive (a half-empty `<url>` element must
//! not abort the batch) while everything past the validation boundary can
//! rely on `location` being a real URL.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{EntryError, FetchErrorKind};

/// Publication status applied to every record of a run.
///
/// Chosen once by the operator, mirroring the publish/draft selector of
/// the import form this tool replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Publish,
    Draft,
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostStatus::Publish => write!(f, "publish"),
            PostStatus::Draft => write!(f, "draft"),
        }
    }
}

/// One `<url>` element of the sitemap, untouched.
///
/// Values are whatever the document carried; missing children are empty
/// strings rather than errors. Validation into an [`ArticleDescriptor`]
/// happens separately so one bad entry never poisons its batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapEntry {
    /// Article URL from `<loc>`.
    pub loc: String,
    /// Headline from `<news:title>`.
    pub title: String,
    /// Timestamp text from `<news:publication_date>`.
    pub publication_date: String,
}

impl SitemapEntry {
    /// Validate this entry into an [`ArticleDescriptor`].
    ///
    /// The only hard requirement is an absolute `loc` URL; everything
    /// else degrades gracefully (an empty or unparseable date becomes
    /// `None`).
    pub fn into_descriptor(self, status: PostStatus) -> Result<ArticleDescriptor, EntryError> {
        let location = Url::parse(&self.loc).map_err(|source| EntryError::InvalidLocation {
            title: self.title.clone(),
            loc: self.loc.clone(),
            source,
        })?;
        let published_at = parse_publication_date(&self.publication_date);
        Ok(ArticleDescriptor {
            location,
            title: self.title,
            published_at,
            status,
        })
    }
}

/// Parse the sitemap's publication date leniently.
///
/// News sitemaps carry RFC-3339 (`2024-01-05T07:30:00+07:00`), sometimes
/// without an offset or with a space separator. Anything unrecognized is
/// `None`; a missing date must not block an import.
fn parse_publication_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// A validated article reference from the sitemap.
///
/// Immutable once built; consumed exactly once by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDescriptor {
    /// Absolute URL of the article page.
    pub location: Url,
    /// Headline, also the store's dedup key (exact string match).
    pub title: String,
    /// Publication timestamp, when the sitemap carried a usable one.
    pub published_at: Option<DateTime<FixedOffset>>,
    /// Publish/draft status for the created record.
    pub status: PostStatus,
}

impl ArticleDescriptor {
    /// Category for this article: the first non-empty path segment of the
    /// location, e.g. `daerah` for `https://example.com/daerah/berita-1`.
    /// Empty when the URL has no path segments.
    pub fn category(&self) -> String {
        self.location
            .path_segments()
            .into_iter()
            .flatten()
            .find(|segment| !segment.is_empty())
            .unwrap_or_default()
            .to_string()
    }
}

/// Outcome of fetching one page.
///
/// Exactly one of `body`/`error` is populated. Transport failures and
/// non-success HTTP statuses both land in `error`; neither is ever
/// raised as a Rust error, so a dead link cannot abort a batch.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Response body, present on success only.
    pub body: Option<String>,
    /// Failure classification, present on failure only.
    pub error: Option<FetchErrorKind>,
}

impl FetchResult {
    /// A successful fetch carrying `body`.
    pub fn fetched(body: String) -> Self {
        Self {
            body: Some(body),
            error: None,
        }
    }

    /// A failed fetch carrying its classification.
    pub fn failed(kind: FetchErrorKind) -> Self {
        Self {
            body: None,
            error: Some(kind),
        }
    }

    /// Whether a body was retrieved.
    pub fn is_ok(&self) -> bool {
        self.body.is_some()
    }
}

/// Sanitized article markup.
///
/// Guaranteed free of `div`, `a`, `center`, and `script` elements, HTML
/// comments, and see-also boilerplate. Always a parseable fragment, even
/// when the input page was malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedContent {
    pub html: String,
}

/// Marker returned when a page has no `<article>` element at all.
pub const NO_ARTICLE_SENTINEL: &str = "No <article> tag found";

impl CleanedContent {
    pub fn new(html: String) -> Self {
        Self { html }
    }

    /// Empty content, used when a fetch produced no body.
    pub fn empty() -> Self {
        Self {
            html: String::new(),
        }
    }

    /// The marker content for pages without an `<article>` region.
    pub fn no_article() -> Self {
        Self {
            html: NO_ARTICLE_SENTINEL.to_string(),
        }
    }
}

/// A normalized image reference from the media region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Image URL with all whitespace and non-URL characters removed.
    pub url: String,
    /// Caption text from the `alt` attribute, empty when absent.
    pub alt: String,
}

/// A finished article, ready for the store.
///
/// Ownership moves to the store on emission; the pipeline keeps nothing.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleRecord {
    pub descriptor: ArticleDescriptor,
    pub content: CleanedContent,
    /// Media-region images in document order.
    pub images: Vec<ImageRef>,
    /// First path segment of the location; may be empty.
    pub category: String,
}

/// Aggregate outcome of one `import_batch` call.
///
/// `messages` preserves input descriptor order. Duplicate skips appear as
/// messages without counting toward `failed`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportBatchResult {
    /// Records created in the store.
    pub succeeded: usize,
    /// Descriptors whose record could not be created.
    pub failed: usize,
    /// Per-item notices: fetch failures, duplicate skips, store errors.
    pub messages: Vec<String>,
}

impl ImportBatchResult {
    /// Fold another batch's counts and messages into this one. The driver
    /// uses this to report a whole run across batch boundaries.
    pub fn merge(&mut self, other: ImportBatchResult) {
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.messages.extend(other.messages);
    }
}
