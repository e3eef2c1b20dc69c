//! Error types for response interception and the proxy loop.
//!
//! Fetch errors are always recoverable: the interceptor converts them into a
//! pass-through decision, so no error from this module ever reaches the end
//! client as a broken response. Server errors cover the transport adapter
//! around the interceptor (accept loop and connection serving).

use thiserror::Error;

/// Errors from the secondary fetch of an un-minified asset.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The catalog URI could not be parsed or used as a request target.
    #[error("Invalid fetch URI '{0}'")]
    InvalidUri(String),

    /// Network failure or timeout while fetching.
    #[error("Fetch of '{uri}' failed: {source}")]
    Request {
        /// The URI we tried to fetch.
        uri: String,
        /// Underlying client error.
        source: reqwest::Error,
    },

    /// The secondary source answered with a non-success status.
    #[error("Fetch of '{uri}' returned status {status}")]
    Status {
        /// The URI we tried to fetch.
        uri: String,
        /// The status code received.
        status: u16,
    },

    /// The secondary source answered with an empty body.
    ///
    /// An empty un-minified asset is never a valid substitute.
    #[error("Fetch of '{0}' returned an empty body")]
    EmptyBody(String),
}

/// Errors from the proxy server loop.
///
/// Per-exchange problems (a non-absolute request target, an unreachable
/// origin) are answered inline with 400/502 status responses and never
/// surface here; these variants cover the connection and socket layer only.
#[derive(Debug, Error)]
pub enum ServerError {
    /// I/O error (socket operations).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Hyper HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = FetchError::Status {
            uri: "https://cdn.example.com/lib.js".to_string(),
            status: 500,
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("cdn.example.com"));
    }

    #[test]
    fn test_empty_body_error_display() {
        let err = FetchError::EmptyBody("https://cdn.example.com/lib.js".to_string());
        assert!(err.to_string().contains("empty body"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let server_err: ServerError = io_err.into();
        assert!(matches!(server_err, ServerError::Io(_)));
    }
}
