//! Response interception and substitution.
//!
//! This module is the heart of maxify. Each outbound proxy response passes
//! through [`ResponseInterceptor::on_response_receive`], which recognizes
//! known minified script assets by filename, verifies the served body
//! against its known-good SHA-256 digest, validates the un-minified
//! counterpart with a bounded secondary fetch, and replaces the response
//! with a 307 redirect to the readable source.
//!
//! # Architecture
//!
//! ```text
//!  client ──▶ ProxyServer ──▶ origin server
//!                  │
//!                  ▼ (buffered response)
//!          ResponseInterceptor
//!           │ Catalog.lookup(filename)
//!           │ sha256(body) vs minSha256Digest
//!           │ Fetcher.fetch(maxURI)
//!           ▼
//!    307 redirect  or  original response
//! ```
//!
//! Failure semantics: every per-exchange error degrades to forwarding the
//! original response unchanged. Only catalog/config load errors at startup
//! are fatal.

pub mod digest;
pub mod error;
pub mod fetch;
pub mod rewrite;
pub mod server;

// Re-export main types for convenient access
pub use digest::sha256_hex;
pub use error::{FetchError, ServerError};
pub use fetch::{Fetcher, DEFAULT_FETCH_TIMEOUT};
pub use rewrite::{InterceptedResponse, ResponseInterceptor};
pub use server::ProxyServer;
