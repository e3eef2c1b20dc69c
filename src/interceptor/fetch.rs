//! Secondary fetch of un-minified assets.
//!
//! When a tracked minified asset is intercepted, its un-minified counterpart
//! is fetched from the catalog's `maxURI` over an independent outbound
//! connection - never by reusing the intercepted exchange. The fetch is
//! bounded by a timeout so a slow secondary source can never hang the proxy
//! pipeline.

use std::time::Duration;

use bytes::Bytes;
use tracing::debug;

use super::error::FetchError;

/// Default timeout for secondary fetches.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound HTTP client for fetching un-minified assets.
///
/// Cheap to clone; the underlying connection pool is shared. Each fetch is
/// independently cancellable and holds no locks while in flight.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Create a fetcher with the given per-request timeout.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::Request {
                uri: "<client construction>".to_string(),
                source: e,
            })?;

        Ok(Self { client })
    }

    /// Create a fetcher with the default timeout (for tests and tools).
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(DEFAULT_FETCH_TIMEOUT, concat!("maxify/", env!("CARGO_PKG_VERSION")))
    }

    /// GET the asset at `uri` and return its body.
    ///
    /// Fails on network errors, timeouts, non-success statuses, and empty
    /// bodies. The caller treats any failure as "abort substitution".
    pub async fn fetch(&self, uri: &str) -> Result<Bytes, FetchError> {
        let url: reqwest::Url = uri
            .parse()
            .map_err(|_| FetchError::InvalidUri(uri.to_string()))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                uri: uri.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                uri: uri.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| FetchError::Request {
            uri: uri.to_string(),
            source: e,
        })?;

        if body.is_empty() {
            return Err(FetchError::EmptyBody(uri.to_string()));
        }

        debug!(uri = %uri, bytes = body.len(), "Fetched un-minified asset");
        Ok(body)
    }
}
