//! Page retrieval.
//!
//! A fetch is a single GET with a bounded timeout: no retry, no redirect
//! policy beyond the client default. Transport failures and non-success
//! statuses are folded into [`FetchResult`] instead of being raised, so a
//! dead article link costs one message in the batch result, never the
//! batch. Retries, if any caller ever wants them, are that caller's
//! policy.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::{ConfigError, FetchErrorKind};
use crate::models::FetchResult;
use crate::utils::truncate_for_log;

/// A source of raw page bodies.
///
/// The pipeline takes this as an injected collaborator so tests can
/// substitute canned pages for the network.
#[async_trait]
pub trait PageFetch: Send + Sync {
    /// Retrieve the body at `url`. Must not block unboundedly and must
    /// not panic or error for ordinary HTTP failures.
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// HTTP-backed [`PageFetch`] implementation.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

fn classify(error: &reqwest::Error) -> FetchErrorKind {
    if error.is_timeout() {
        FetchErrorKind::Timeout
    } else {
        FetchErrorKind::Transport(error.to_string())
    }
}

#[async_trait]
impl PageFetch for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> FetchResult {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, %url, "Fetch failed");
                return FetchResult::failed(classify(&e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), %url, "Fetch returned non-success status");
            return FetchResult::failed(FetchErrorKind::Status(status.as_u16()));
        }

        match response.text().await {
            Ok(body) => {
                debug!(bytes = body.len(), preview = %truncate_for_log(&body, 120), "Fetched page");
                FetchResult::fetched(body)
            }
            Err(e) => {
                warn!(error = %e, %url, "Failed reading response body");
                FetchResult::failed(if e.is_timeout() {
                    FetchErrorKind::Timeout
                } else {
                    FetchErrorKind::Body(e.to_string())
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_construction() {
        assert!(HttpFetcher::new(Duration::from_secs(30), "test-agent/1.0").is_ok());
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_a_result_not_an_error() {
        let fetcher = HttpFetcher::new(Duration::from_secs(2), "test-agent/1.0").unwrap();
        let result = fetcher
            .fetch("http://definitely-not-a-real-host.invalid/page")
            .await;
        assert!(!result.is_ok());
        assert!(matches!(
            result.error,
            Some(FetchErrorKind::Transport(_)) | Some(FetchErrorKind::Timeout)
        ));
    }
}
