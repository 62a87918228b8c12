//! Configuration system for the rendezvous CLI.

use rendezvous_proto::validate::{MAX_DISCOVER_LIMIT, MAX_NAMESPACE_LENGTH, MAX_TTL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Identity configuration
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Request defaults
    #[serde(default)]
    pub defaults: RequestDefaults,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Identity configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Private key file path
    #[serde(default = "default_private_key_path")]
    pub private_key_file: PathBuf,
}

/// Values used when a command line flag is not given
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestDefaults {
    /// Namespace; empty is the default namespace
    #[serde(default)]
    pub namespace: String,
    /// Registration TTL in seconds; 0 leaves it to the rendezvous point
    #[serde(default = "default_ttl")]
    pub ttl: i64,
    /// Discovery limit; 0 leaves it to the rendezvous point
    #[serde(default)]
    pub limit: i64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_private_key_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(".rendezvous/private_key")
}

fn default_ttl() -> i64 {
    rendezvous_proto::DEFAULT_TTL
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            private_key_file: default_private_key_path(),
        }
    }
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            ttl: default_ttl(),
            limit: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;
        Ok(())
    }

    /// Get default config path
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("rendezvous/config.toml")
    }

    /// Load config from default path, or create default if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if reading or creating the config fails.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let path = Self::default_path();

        if path.exists() {
            Self::load(&path)
        } else {
            let config = Self::default();
            config.save(&path)?;
            Ok(config)
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.defaults.namespace.len() > MAX_NAMESPACE_LENGTH {
            anyhow::bail!(
                "Default namespace is longer than {} bytes",
                MAX_NAMESPACE_LENGTH
            );
        }

        if self.defaults.ttl > MAX_TTL {
            anyhow::bail!("Default TTL must not exceed {} seconds", MAX_TTL);
        }

        if self.defaults.limit > MAX_DISCOVER_LIMIT {
            anyhow::bail!("Default limit must not exceed {}", MAX_DISCOVER_LIMIT);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.defaults.ttl, 7200);
        assert_eq!(config.defaults.limit, 0);
        assert!(config.defaults.namespace.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.defaults.ttl = MAX_TTL + 1;
        assert!(config.validate().is_err());

        config.defaults.ttl = 60;
        config.defaults.limit = MAX_DISCOVER_LIMIT + 1;
        assert!(config.validate().is_err());

        config.defaults.limit = 10;
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[defaults]\nnamespace = \"waku\"\n").unwrap();
        assert_eq!(config.defaults.namespace, "waku");
        assert_eq!(config.defaults.ttl, 7200);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        let mut config = Config::default();
        config.defaults.namespace = "rdv".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.defaults.namespace, "rdv");
        assert_eq!(loaded.defaults.ttl, config.defaults.ttl);
    }
}
