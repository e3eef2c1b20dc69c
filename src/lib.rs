//! maxify: un-minifying HTTP response filter proxy
//!
//! This crate watches outbound proxy responses for known minified script
//! assets, verifies the served bytes against a known-good SHA-256 digest,
//! and substitutes the un-minified variant (via 307 redirect to its source)
//! so that security testers can read what they are auditing.
//!
//! # Failure Model
//!
//! Per-exchange processing is **fail-open on itself**: any internal error
//! (unreachable secondary source, timeout, malformed data) degrades to
//! forwarding the original response unchanged. Only startup errors - a
//! missing or malformed catalog or configuration - are fatal.
//!
//! # Architecture
//!
//! - **Catalog**: immutable filename → library-identity table, loaded once
//! - **Interceptor**: the per-exchange lookup/digest/fetch/redirect machine
//! - **Config**: hierarchical TOML configuration
//! - **Telemetry**: structured syslog audit events for rewrite decisions

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod interceptor;
pub mod telemetry;
