//! The response rewrite state machine.
//!
//! This is the core of maxify: one call per outbound proxy response. The
//! flow for each exchange is:
//!
//! 1. Derive the asset filename from the request URI (last path segment)
//! 2. Look it up in the catalog; a miss passes the response through untouched
//! 3. Hash the served body and compare against the expected minified digest;
//!    a mismatch is reported but does not block substitution
//! 4. Fetch the un-minified counterpart from its catalog source
//! 5. On a successful, non-empty fetch, replace the response with a
//!    307 redirect to the un-minified source
//!
//! Every failure along the way degrades to "pass the original response
//! through unchanged" - the filter never surfaces its own errors as broken
//! responses and never aborts the proxy pipeline.

use std::sync::Arc;

use bytes::Bytes;
use http::header::LOCATION;
use http::{HeaderMap, HeaderValue, StatusCode, Uri};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::telemetry::{AuditEvent, AuditLogger, DigestOutcome, SkipReason};

use super::digest::sha256_hex;
use super::error::FetchError;
use super::fetch::Fetcher;

/// One HTTP exchange as seen by the filter.
///
/// Created per exchange by the transport adapter, passed by value through
/// [`ResponseInterceptor::on_response_receive`], and handed back to the
/// adapter for forwarding. The interceptor owns it only for that one call.
#[derive(Debug, Clone)]
pub struct InterceptedResponse {
    /// The originating request URI (used to derive the asset filename).
    pub request_uri: Uri,
    /// Response status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Buffered response body.
    pub body: Bytes,
}

/// The per-exchange response filter.
///
/// Safe under concurrent invocation: the catalog is immutable, the fetcher
/// holds no cross-exchange state, and each call is self-contained.
pub struct ResponseInterceptor {
    catalog: Arc<Catalog>,
    fetcher: Fetcher,
    audit: Arc<AuditLogger>,
}

impl ResponseInterceptor {
    /// Create an interceptor over the given catalog.
    pub fn new(catalog: Arc<Catalog>, fetcher: Fetcher, audit: Arc<AuditLogger>) -> Self {
        Self {
            catalog,
            fetcher,
            audit,
        }
    }

    /// Process one outbound response, returning the response to forward.
    ///
    /// Infallible by contract: on any internal failure the original response
    /// is returned unchanged. The outbound fetch is bounded by the fetcher's
    /// timeout, so this never hangs the exchange indefinitely.
    pub async fn on_response_receive(&self, response: InterceptedResponse) -> InterceptedResponse {
        let filename = derive_filename(&response.request_uri).to_string();

        let Some(entry) = self.catalog.lookup(&filename) else {
            // Dominant path: not a tracked asset.
            return response;
        };

        debug!(filename = %filename, "Intercepted tracked asset");

        // Compare the served body with the expected digest of the minified
        // script. A mismatch could be a newer CDN build or a tampered
        // response; either way the operator wants the readable variant, so
        // we report and continue.
        let served_digest = sha256_hex(&response.body);
        let digest = if served_digest == entry.min_sha256_digest {
            DigestOutcome::Match
        } else {
            warn!(
                filename = %filename,
                expected = %entry.min_sha256_digest,
                actual = %served_digest,
                "Served body does not match the known minified digest"
            );
            self.audit.log(AuditEvent::DigestMismatch {
                filename: filename.clone(),
                expected: entry.min_sha256_digest.clone(),
                actual: served_digest,
            });
            DigestOutcome::Mismatch
        };

        // Fetch the un-minified counterpart over an independent connection.
        // The fetched bytes validate that the source is live and non-empty
        // before we hand the client a redirect to it.
        let fetched = match self.fetcher.fetch(&entry.max_uri).await {
            Ok(body) => body,
            Err(e) => {
                let reason = match e {
                    FetchError::EmptyBody(_) => SkipReason::EmptyBody,
                    _ => SkipReason::FetchFailed,
                };
                info!(filename = %filename, error = %e, "Substitution abandoned");
                self.audit.log(AuditEvent::SubstitutionSkipped {
                    filename,
                    reason,
                });
                return response;
            }
        };

        if let Some(ref expected_max) = entry.max_sha256_digest {
            let max_digest = sha256_hex(&fetched);
            if &max_digest != expected_max {
                // Informational only; the un-minified digest is not load-bearing.
                warn!(
                    filename = %filename,
                    expected = %expected_max,
                    actual = %max_digest,
                    "Fetched un-minified body does not match its recorded digest"
                );
            }
        }

        let redirect = match redirect_response(&response.request_uri, &entry.max_uri) {
            Some(r) => r,
            None => {
                // Catalog URI is not a valid header value; keep the original.
                warn!(filename = %filename, max_uri = %entry.max_uri, "Invalid redirect target");
                self.audit.log(AuditEvent::SubstitutionSkipped {
                    filename,
                    reason: SkipReason::FetchFailed,
                });
                return response;
            }
        };

        info!(
            filename = %filename,
            max_uri = %entry.max_uri,
            digest = ?digest,
            "Substituting minified asset with redirect to un-minified source"
        );
        self.audit.log(AuditEvent::SubstitutionApplied {
            filename,
            max_uri: entry.max_uri.clone(),
            digest,
        });

        redirect
    }
}

/// Derive the asset filename from a request URI.
///
/// Takes the last `/`-separated segment of the path; if the path contains no
/// separator, the whole path is the filename. Query strings are not part of
/// `Uri::path()` and never leak into the result.
fn derive_filename(uri: &Uri) -> &str {
    let path = uri.path();
    match path.rfind('/') {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// Build the 307 redirect that replaces a tracked minified response.
///
/// Returns None if `max_uri` cannot be encoded as a Location header value.
fn redirect_response(request_uri: &Uri, max_uri: &str) -> Option<InterceptedResponse> {
    let location = HeaderValue::from_str(max_uri).ok()?;

    let mut headers = HeaderMap::new();
    headers.insert(LOCATION, location);

    Some(InterceptedResponse {
        request_uri: request_uri.clone(),
        status: StatusCode::TEMPORARY_REDIRECT,
        headers,
        body: Bytes::new(),
    })
}
