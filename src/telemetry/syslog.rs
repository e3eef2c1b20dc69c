//! Syslog integration for audit logging.
//!
//! All audit events are logged to syslog with the `MAXIFY_PROXY` tag so that
//! rewrite decisions can be reviewed alongside other proxy session logs.

use std::sync::Mutex;

use syslog::{Facility, Formatter3164};
use tracing::{debug, error};

use super::error::TelemetryError;
use super::events::AuditEvent;

/// Syslog tag for all audit events.
pub const SYSLOG_TAG: &str = "MAXIFY_PROXY";

/// Audit logger that writes structured JSON events to syslog.
///
/// One instance is created at startup and shared as an `Arc` into everything
/// that logs. Uses interior mutability (Mutex) so logging works from shared
/// references.
pub struct AuditLogger {
    /// Syslog writer protected by a mutex for interior mutability.
    /// None indicates a null logger (for testing).
    writer: Option<Mutex<syslog::Logger<syslog::LoggerBackend, Formatter3164>>>,
}

impl AuditLogger {
    /// Create a new audit logger connected to syslog.
    ///
    /// Uses Unix socket connection to local syslog daemon.
    pub fn new() -> Result<Self, TelemetryError> {
        let formatter = Formatter3164 {
            facility: Facility::LOG_USER,
            hostname: None,
            process: SYSLOG_TAG.to_string(),
            pid: std::process::id(),
        };

        let writer = syslog::unix(formatter).map_err(|e| {
            TelemetryError::SyslogConnection(format!("Failed to connect to syslog: {}", e))
        })?;

        debug!("Connected to syslog with tag '{}'", SYSLOG_TAG);
        Ok(Self {
            writer: Some(Mutex::new(writer)),
        })
    }

    /// Create a null audit logger that discards all events.
    ///
    /// Useful for testing when syslog is not available.
    pub fn new_null() -> Self {
        Self { writer: None }
    }

    /// Log an audit event to syslog.
    ///
    /// The event is serialized to JSON with an ISO8601 timestamp.
    /// If this is a null logger, the event is silently discarded.
    pub fn log(&self, event: AuditEvent) {
        let Some(ref writer) = self.writer else {
            // Null logger - discard silently
            return;
        };

        let timestamped = event.with_timestamp();

        match serde_json::to_string(&timestamped) {
            Ok(json) => {
                // Log at INFO level to syslog
                match writer.lock() {
                    Ok(mut writer) => {
                        if let Err(e) = writer.info(&json) {
                            error!("Failed to write to syslog: {}", e);
                        }
                    }
                    Err(e) => {
                        error!("Failed to acquire syslog writer lock: {}", e);
                    }
                }
                debug!("Logged audit event: {}", json);
            }
            Err(e) => {
                error!("Failed to serialize audit event: {}", e);
            }
        }
    }

    /// Check if this is a null logger.
    pub fn is_null(&self) -> bool {
        self.writer.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: These tests require a running syslog daemon.
    // In CI environments, they may be skipped or require special setup.

    #[test]
    fn test_syslog_tag() {
        assert_eq!(SYSLOG_TAG, "MAXIFY_PROXY");
    }

    #[test]
    fn test_null_logger_discards() {
        let logger = AuditLogger::new_null();
        assert!(logger.is_null());

        // Should not panic or touch syslog
        logger.log(AuditEvent::CatalogLoaded {
            path: "<test>".to_string(),
            entries: 0,
        });
    }

    #[test]
    fn test_logger_is_shareable_across_threads() {
        let logger = std::sync::Arc::new(AuditLogger::new_null());

        let handles: Vec<_> = (0..4usize)
            .map(|i| {
                let logger = logger.clone();
                std::thread::spawn(move || {
                    logger.log(AuditEvent::CatalogLoaded {
                        path: format!("<thread {}>", i),
                        entries: i,
                    });
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    // Integration test - requires syslog daemon
    #[test]
    #[ignore = "Requires running syslog daemon"]
    fn test_logger_creation() {
        let logger = AuditLogger::new();
        assert!(logger.is_ok());
    }
}
