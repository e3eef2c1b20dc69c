//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur during telemetry operations.
///
/// Only logger construction is fallible; logging itself degrades to a
/// tracing error instead of propagating.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to connect to syslog.
    #[error("Failed to connect to syslog: {0}")]
    SyslogConnection(String),
}
