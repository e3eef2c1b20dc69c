//! Telemetry and audit logging for maxify.
//!
//! This module provides structured logging to syslog with the `MAXIFY_PROXY`
//! tag. Every rewrite decision on a tracked asset is logged for audit trails.
//!
//! # Architecture
//!
//! - **Audit logging** (syslog): rewrite decisions go to syslog, never
//!   stdout/stderr
//! - **Debug logging** (tracing): development logs go to stderr via `tracing`
//! - These are completely separate concerns
//!
//! # Event Format
//!
//! Events are logged as JSON with an ISO8601 timestamp:
//!
//! ```json
//! {"ts":"2026-08-29T14:32:01Z","event":"substitution_applied","filename":"jquery.min.js","max_uri":"https://code.jquery.com/jquery-3.7.1.js","digest":"match"}
//! ```

mod error;
mod events;
mod syslog;

pub use error::TelemetryError;
pub use events::{AuditEvent, DigestOutcome, SkipReason};
pub use syslog::{AuditLogger, SYSLOG_TAG};
