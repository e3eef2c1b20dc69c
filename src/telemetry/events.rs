//! Audit event types for structured logging.
//!
//! These events are logged to syslog with the `MAXIFY_PROXY` tag so that
//! proxy operators can audit exactly which responses were rewritten and why.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Audit events emitted by the response filter.
///
/// One event is logged per matched exchange (plus catalog-load events at
/// startup). Untracked assets are the dominant path and are intentionally
/// not logged here; they only appear in debug tracing.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    /// Library catalog loaded at startup.
    CatalogLoaded {
        /// Source the catalog was loaded from.
        path: String,
        /// Number of entries in the catalog.
        entries: usize,
    },

    /// A tracked asset was replaced with a redirect to its un-minified source.
    SubstitutionApplied {
        /// Filename that matched the catalog.
        filename: String,
        /// Redirect target (the un-minified source URI).
        max_uri: String,
        /// Outcome of the minified-body digest check.
        digest: DigestOutcome,
    },

    /// A tracked asset was matched but passed through unmodified.
    SubstitutionSkipped {
        /// Filename that matched the catalog.
        filename: String,
        /// Why substitution was abandoned.
        reason: SkipReason,
    },

    /// The served body did not match the expected minified digest.
    ///
    /// Informational: substitution is still attempted. A mismatch can mean a
    /// newer CDN build, a tampered response, or an unrelated file reusing a
    /// tracked name.
    DigestMismatch {
        /// Filename that matched the catalog.
        filename: String,
        /// Digest recorded in the catalog.
        expected: String,
        /// Digest of the body actually served.
        actual: String,
    },
}

/// Outcome of comparing a served body against the catalog digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestOutcome {
    /// Body matches the known minified baseline.
    Match,
    /// Body differs from the known minified baseline.
    Mismatch,
}

/// Reasons for abandoning a substitution after a catalog match.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The secondary fetch failed (network error, timeout, non-success status).
    FetchFailed,
    /// The secondary fetch succeeded but returned an empty body.
    EmptyBody,
}

/// Wrapper for serializing events with timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct TimestampedEvent<'a> {
    /// ISO8601 timestamp.
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,

    /// The actual event (flattened into this struct).
    #[serde(flatten)]
    pub event: &'a AuditEvent,
}

impl AuditEvent {
    /// Wrap this event with a timestamp for serialization.
    pub fn with_timestamp(&self) -> TimestampedEvent<'_> {
        TimestampedEvent {
            timestamp: Utc::now(),
            event: self,
        }
    }
}
