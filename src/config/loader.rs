//! Configuration loading with hierarchy merging.
//!
//! Configuration is loaded from multiple sources and merged in order:
//!
//! 1. Embedded defaults (compiled into binary)
//! 2. System config: `/etc/maxify/config.toml`
//! 3. User config: `~/.config/maxify/config.toml`
//! 4. Additional config file (via `--config` flag)
//! 5. CLI flags (highest priority)
//!
//! Missing system/user files are not errors - they are simply skipped.
//! A missing `--config` file and invalid TOML fail fast with a clear message.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use super::error::ConfigError;
use super::schema::Config;
use crate::cli::Cli;

/// System-wide configuration path.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/maxify/config.toml";

/// User configuration directory name.
pub const USER_CONFIG_DIR: &str = "maxify";

/// User configuration filename.
pub const USER_CONFIG_FILE: &str = "config.toml";

/// Configuration loader with support for hierarchy merging.
pub struct ConfigLoader {
    /// Path to system-wide configuration.
    system_path: PathBuf,
    /// Path to user configuration.
    user_path: PathBuf,
}

impl ConfigLoader {
    /// Create a new ConfigLoader with default paths.
    #[must_use]
    pub fn new() -> Self {
        let user_config_dir = dirs::config_dir()
            .map(|p| p.join(USER_CONFIG_DIR))
            .unwrap_or_else(|| PathBuf::from(".config").join(USER_CONFIG_DIR));

        Self {
            system_path: PathBuf::from(SYSTEM_CONFIG_PATH),
            user_path: user_config_dir.join(USER_CONFIG_FILE),
        }
    }

    /// Create a ConfigLoader with custom paths (for testing).
    #[must_use]
    pub fn with_paths(system_path: PathBuf, user_path: PathBuf) -> Self {
        Self {
            system_path,
            user_path,
        }
    }

    /// Load and merge configuration from all sources.
    pub fn load(&self, cli: &Cli) -> Result<Config, ConfigError> {
        // Start with embedded defaults
        let mut config = Config::default();
        debug!("Loaded embedded default configuration");

        // Load and merge system config
        if let Some(system_config) = self.load_file(&self.system_path)? {
            config.merge(system_config);
            debug!("Loaded system config from {:?}", self.system_path);
        } else {
            debug!("No system config found at {:?}", self.system_path);
        }

        // Load and merge user config
        if let Some(user_config) = self.load_file(&self.user_path)? {
            config.merge(user_config);
            debug!("Loaded user config from {:?}", self.user_path);
        } else {
            debug!("No user config found at {:?}", self.user_path);
        }

        // Load and merge additional config file from CLI
        if let Some(ref cli_config_path) = cli.config {
            match self.load_file(cli_config_path)? {
                Some(cli_config) => {
                    config.merge(cli_config);
                    debug!("Loaded additional config from {:?}", cli_config_path);
                }
                None => {
                    // Unlike system/user config, a missing CLI-specified config is an error
                    return Err(ConfigError::ReadError {
                        path: cli_config_path.clone(),
                        source: std::io::Error::new(
                            std::io::ErrorKind::NotFound,
                            "Specified config file not found",
                        ),
                    });
                }
            }
        }

        // Apply CLI flags (highest priority)
        if let Some(ref listen) = cli.listen {
            config.listener.bind_address = listen.clone();
            debug!("Listen address overridden from CLI: {}", listen);
        }
        if let Some(ref catalog_path) = cli.catalog {
            config.catalog.path = catalog_path.display().to_string();
            debug!("Catalog path overridden from CLI: {:?}", catalog_path);
        }

        // A catalog is required: the filter cannot run without one.
        if config.catalog.path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "catalog.path".to_string(),
                message: "no catalog file configured (set [catalog] path or pass --catalog)"
                    .to_string(),
            });
        }

        Ok(config)
    }

    /// Load a config file, returning None if it doesn't exist.
    fn load_file(&self, path: &PathBuf) -> Result<Option<Config>, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config: Config =
                    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                        path: path.clone(),
                        source: e,
                    })?;
                Ok(Some(config))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::ReadError {
                path: path.clone(),
                source: e,
            }),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_test_cli() -> Cli {
        Cli {
            command: None,
            config: None,
            catalog: Some(PathBuf::from("/etc/maxify/maxify.json")),
            listen: None,
            verbose: 0,
        }
    }

    #[test]
    fn test_missing_files_use_defaults() {
        let dir = tempdir().unwrap();
        let loader = ConfigLoader::with_paths(
            dir.path().join("nonexistent_system.toml"),
            dir.path().join("nonexistent_user.toml"),
        );

        let cli = create_test_cli();
        let config = loader.load(&cli).unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:8888");
        assert_eq!(config.fetch.timeout_secs, 10);
    }

    #[test]
    fn test_user_config_overrides_system() {
        let dir = tempdir().unwrap();

        let system_config = r#"
            [fetch]
            timeout_secs = 20
        "#;
        fs::write(dir.path().join("system.toml"), system_config).unwrap();

        let user_config = r#"
            [fetch]
            timeout_secs = 5
        "#;
        fs::write(dir.path().join("user.toml"), user_config).unwrap();

        let loader = ConfigLoader::with_paths(
            dir.path().join("system.toml"),
            dir.path().join("user.toml"),
        );

        let cli = create_test_cli();
        let config = loader.load(&cli).unwrap();

        assert_eq!(config.fetch.timeout_secs, 5);
    }

    #[test]
    fn test_catalog_path_from_config_file() {
        let dir = tempdir().unwrap();

        let user_config = r#"
            [catalog]
            path = "/opt/maxify/maxify.json"
        "#;
        fs::write(dir.path().join("user.toml"), user_config).unwrap();

        let loader = ConfigLoader::with_paths(
            dir.path().join("system.toml"),
            dir.path().join("user.toml"),
        );

        let mut cli = create_test_cli();
        cli.catalog = None;
        let config = loader.load(&cli).unwrap();

        assert_eq!(config.catalog.path, "/opt/maxify/maxify.json");
    }

    #[test]
    fn test_later_file_without_section_keeps_earlier_values() {
        let dir = tempdir().unwrap();

        let system_config = r#"
            [fetch]
            timeout_secs = 20
        "#;
        fs::write(dir.path().join("system.toml"), system_config).unwrap();

        // No [fetch] section here; the system value must survive the merge.
        let user_config = r#"
            [catalog]
            path = "/opt/maxify/maxify.json"
        "#;
        fs::write(dir.path().join("user.toml"), user_config).unwrap();

        let loader = ConfigLoader::with_paths(
            dir.path().join("system.toml"),
            dir.path().join("user.toml"),
        );

        let cli = create_test_cli();
        let config = loader.load(&cli).unwrap();

        assert_eq!(config.fetch.timeout_secs, 20);
    }

    #[test]
    fn test_cli_flags_have_highest_priority() {
        let dir = tempdir().unwrap();

        let user_config = r#"
            [listener]
            bind_address = "0.0.0.0:3128"

            [catalog]
            path = "/opt/maxify/maxify.json"
        "#;
        fs::write(dir.path().join("user.toml"), user_config).unwrap();

        let loader = ConfigLoader::with_paths(
            dir.path().join("system.toml"),
            dir.path().join("user.toml"),
        );

        let mut cli = create_test_cli();
        cli.listen = Some("127.0.0.1:9000".to_string());
        cli.catalog = Some(PathBuf::from("/tmp/override.json"));
        let config = loader.load(&cli).unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.catalog.path, "/tmp/override.json");
    }

    #[test]
    fn test_missing_catalog_is_an_error() {
        let dir = tempdir().unwrap();
        let loader = ConfigLoader::with_paths(
            dir.path().join("system.toml"),
            dir.path().join("user.toml"),
        );

        let mut cli = create_test_cli();
        cli.catalog = None;
        let result = loader.load(&cli);

        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_missing_cli_config_is_an_error() {
        let dir = tempdir().unwrap();
        let loader = ConfigLoader::with_paths(
            dir.path().join("system.toml"),
            dir.path().join("user.toml"),
        );

        let mut cli = create_test_cli();
        cli.config = Some(dir.path().join("nope.toml"));
        let result = loader.load(&cli);

        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let dir = tempdir().unwrap();

        let invalid_toml = "this is not valid TOML [[[";
        fs::write(dir.path().join("invalid.toml"), invalid_toml).unwrap();

        let loader = ConfigLoader::with_paths(
            dir.path().join("invalid.toml"),
            dir.path().join("user.toml"),
        );

        let cli = create_test_cli();
        let result = loader.load(&cli);

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
