//! Configuration schema definitions.
//!
//! This module defines the structure of the maxify configuration files.
//! Configuration is loaded from multiple sources and merged in order:
//!
//! 1. Embedded defaults
//! 2. System config: `/etc/maxify/config.toml`
//! 3. User config: `~/.config/maxify/config.toml`
//! 4. Additional config file (via `--config` flag)
//! 5. CLI flags (highest priority)

use serde::{Deserialize, Serialize};

/// Top-level configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Listener settings.
    #[serde(default)]
    pub listener: ListenerConfig,

    /// Secondary fetch settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Library catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Config {
    /// Merge another config into this one.
    ///
    /// Scalars are overridden when the other value is non-default.
    pub fn merge(&mut self, other: Config) {
        self.general.merge(other.general);
        self.listener.merge(other.listener);
        self.fetch.merge(other.fetch);
        self.catalog.merge(other.catalog);
    }
}

/// General application settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default)]
    pub log_level: String,
}

impl GeneralConfig {
    fn merge(&mut self, other: GeneralConfig) {
        if !other.log_level.is_empty() {
            self.log_level = other.log_level;
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenerConfig {
    /// Address the proxy listens on (e.g. "127.0.0.1:8888").
    #[serde(default)]
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8888".to_string(),
        }
    }
}

impl ListenerConfig {
    fn merge(&mut self, other: ListenerConfig) {
        let default = ListenerConfig::default();
        if !other.bind_address.is_empty() && other.bind_address != default.bind_address {
            self.bind_address = other.bind_address;
        }
    }
}

/// Secondary fetch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Timeout for secondary fetches in seconds.
    #[serde(default)]
    pub timeout_secs: u64,

    /// User-Agent header sent on secondary fetches.
    #[serde(default)]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("maxify/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    fn merge(&mut self, other: FetchConfig) {
        // A file without a [fetch] section deserializes to the defaults;
        // those must not clobber values set by an earlier source.
        let default = FetchConfig::default();
        if other.timeout_secs != 0 && other.timeout_secs != default.timeout_secs {
            self.timeout_secs = other.timeout_secs;
        }
        if !other.user_agent.is_empty() && other.user_agent != default.user_agent {
            self.user_agent = other.user_agent;
        }
    }
}

/// Library catalog configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CatalogConfig {
    /// Path to the JSON catalog file. Required (here or via `--catalog`).
    #[serde(default)]
    pub path: String,
}

impl CatalogConfig {
    fn merge(&mut self, other: CatalogConfig) {
        if !other.path.is_empty() {
            self.path = other.path;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.listener.bind_address, "127.0.0.1:8888");
        assert_eq!(config.fetch.timeout_secs, 10);
        assert!(config.fetch.user_agent.starts_with("maxify/"));
        assert!(config.catalog.path.is_empty());
    }

    #[test]
    fn test_scalar_merge_overrides() {
        let mut base = Config::default();
        let other = Config {
            listener: ListenerConfig {
                bind_address: "0.0.0.0:9999".to_string(),
            },
            fetch: FetchConfig {
                timeout_secs: 3,
                user_agent: String::new(),
            },
            ..Default::default()
        };

        base.merge(other);

        assert_eq!(base.listener.bind_address, "0.0.0.0:9999");
        assert_eq!(base.fetch.timeout_secs, 3);
        // Empty user_agent does not clobber the default
        assert!(base.fetch.user_agent.starts_with("maxify/"));
    }

    #[test]
    fn test_merge_keeps_existing_when_other_is_default() {
        let mut base = Config::default();
        base.catalog.path = "/etc/maxify/maxify.json".to_string();
        base.general.log_level = "debug".to_string();

        base.merge(Config::default());

        assert_eq!(base.catalog.path, "/etc/maxify/maxify.json");
        assert_eq!(base.general.log_level, "debug");
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str(
            r#"
            [catalog]
            path = "/opt/maxify/maxify.json"

            [fetch]
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.catalog.path, "/opt/maxify/maxify.json");
        assert_eq!(config.fetch.timeout_secs, 5);
    }
}
