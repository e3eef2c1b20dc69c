//! Configuration system for maxify.
//!
//! This module provides TOML configuration loading with hierarchy merging.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded from multiple sources and merged in order:
//!
//! 1. Embedded defaults
//! 2. System config: `/etc/maxify/config.toml`
//! 3. User config: `~/.config/maxify/config.toml`
//! 4. Additional config file (via `--config` flag)
//! 5. CLI flags (highest priority)
//!
//! Scalars are overridden by later sources. The library catalog itself is a
//! separate JSON file (see [`crate::catalog`]); this config only points at it.
//!
//! # Example
//!
//! ```toml
//! [listener]
//! bind_address = "127.0.0.1:8888"
//!
//! [fetch]
//! timeout_secs = 10
//!
//! [catalog]
//! path = "/etc/maxify/maxify.json"
//! ```

mod error;
mod loader;
mod schema;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{CatalogConfig, Config, FetchConfig, GeneralConfig, ListenerConfig};
