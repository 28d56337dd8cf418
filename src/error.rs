//! Typed errors for the import pipeline.
//!
//! Every recoverable condition is data, not control flow: fetch failures
//! live inside [`FetchResult`](crate::models::FetchResult), duplicate
//! titles are an explicit [`StoreError`] variant the pipeline turns into a
//! skip, and per-entry validation problems surface as [`EntryError`]
//! messages. Only a malformed sitemap aborts an ingestion run.

use thiserror::Error;

/// The sitemap document could not be parsed at all.
///
/// This is the single fatal error of an ingestion run: if the XML is not
/// well-formed there is nothing recoverable downstream. Individual `<url>`
/// entries with missing children do *not* produce this error.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// The document is not well-formed XML.
    #[error("sitemap is not well-formed XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// A raw sitemap entry failed boundary validation.
#[derive(Debug, Error)]
pub enum EntryError {
    /// The `<loc>` value is not an absolute URL.
    #[error("entry \"{title}\" has an invalid location {loc:?}: {source}")]
    InvalidLocation {
        title: String,
        loc: String,
        source: url::ParseError,
    },
}

/// Why a page fetch produced no body.
///
/// HTTP error statuses are encoded here rather than raised; see
/// [`FetchResult`](crate::models::FetchResult).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchErrorKind {
    /// The request exceeded the client's bounded timeout.
    #[error("request timed out")]
    Timeout,
    /// Connection, TLS, DNS, or other transport failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// The server answered with a non-success status code.
    #[error("HTTP status {0}")]
    Status(u16),
    /// The response arrived but its body could not be read.
    #[error("failed reading response body: {0}")]
    Body(String),
}

/// Errors reported by a [`ContentStore`](crate::store::ContentStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with this exact title already exists. The pipeline treats
    /// this as a skip, not a failure.
    #[error("a record titled \"{title}\" already exists")]
    DuplicateTitle { title: String },

    /// The referenced record does not exist.
    #[error("no record with id {id}")]
    UnknownRecord { id: u64 },

    /// Filesystem problem in a file-backed store.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record serialization failed.
    #[error("store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Whether this error is the duplicate-title signal.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::DuplicateTitle { .. })
    }
}

/// Problems loading or applying [`ScrapeConfig`](crate::config::ScrapeConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The config file is not valid YAML for [`ScrapeConfig`].
    #[error("failed to parse config file {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },

    /// A configured class token or tag name produced an unusable CSS
    /// selector.
    #[error("configuration yields an invalid selector: {0}")]
    InvalidSelector(String),

    /// A configured phrase produced an unusable cleanup pattern.
    #[error("configuration yields an invalid cleanup pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The HTTP client could not be constructed from the configured
    /// timeout/user-agent.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
