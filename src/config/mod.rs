//! Configuration management for tagbox.
//!
//! This module handles loading, saving, and resolving the configured image
//! board servers and application settings.

mod server;
mod settings;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub use server::Server;
pub use settings::{Settings, DEFAULT_SEARCH_PATH};

/// Environment variable that overrides the configuration file path.
pub const CONFIG_ENV_VAR: &str = "TAGBOX_CONFIG";

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform configuration directory could not be determined.
    #[error("could not determine configuration directory")]
    NoConfigDir,

    /// The configuration directory could not be created.
    #[error("failed to create configuration directory: {0}")]
    CreateDirError(#[source] std::io::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    ReadError(#[source] std::io::Error),

    /// The configuration file could not be written.
    #[error("failed to write configuration file: {0}")]
    WriteError(#[source] std::io::Error),

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A configuration value is invalid.
    #[error("invalid configuration: {0}")]
    ValidationError(String),

    /// A named server does not exist.
    #[error("server '{0}' not found")]
    ServerNotFound(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The complete on-disk configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Name of the server used when none is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_server: Option<String>,
    /// Configured servers.
    #[serde(default)]
    pub servers: Vec<Server>,
    /// Application settings.
    #[serde(default)]
    pub settings: Settings,
}

impl Config {
    /// Load the configuration from `path`.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// fails validation.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;

        info!(path = %path.display(), servers = config.servers.len(), "Loaded configuration");
        Ok(config)
    }

    /// Save the configuration to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(ConfigError::WriteError)?;

        debug!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Resolve the configuration file path.
    ///
    /// `TAGBOX_CONFIG` takes precedence over the platform config directory.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Ok(PathBuf::from(path));
        }

        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join("tagbox").join("config.toml"))
    }

    /// Validate all servers and cross-references.
    pub fn validate(&self) -> Result<()> {
        for (i, server) in self.servers.iter().enumerate() {
            server.validate()?;
            if self.servers[..i].iter().any(|s| s.name == server.name) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate server name '{}'",
                    server.name
                )));
            }
        }

        if let Some(name) = &self.default_server {
            if self.get_server(name).is_none() {
                return Err(ConfigError::ServerNotFound(name.clone()));
            }
        }

        if !self.settings.search_path.starts_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "search_path '{}' must start with '/'",
                self.settings.search_path
            )));
        }

        Ok(())
    }

    /// Record the account name used for `server`.
    ///
    /// The change is only applied when the server stays valid, so callers
    /// can check a user name before storing anything for it.
    pub fn set_username(&mut self, server: &str, username: &str) -> Result<()> {
        let entry = self
            .servers
            .iter_mut()
            .find(|s| s.name == server)
            .ok_or_else(|| ConfigError::ServerNotFound(server.to_string()))?;

        let updated = entry.clone().with_username(username);
        updated.validate()?;
        *entry = updated;
        Ok(())
    }

    /// Look up a server by name.
    pub fn get_server(&self, name: &str) -> Option<&Server> {
        self.servers.iter().find(|s| s.name == name)
    }

    /// Get the default server.
    ///
    /// Falls back to the first configured server when no default is set.
    pub fn get_default_server(&self) -> Option<&Server> {
        match &self.default_server {
            Some(name) => self.get_server(name),
            None => self.servers.first(),
        }
    }

    /// Pick the server to use: the named one, or the default.
    pub fn resolve_server(&self, name: Option<&str>) -> Result<&Server> {
        match name {
            Some(name) => self
                .get_server(name)
                .ok_or_else(|| ConfigError::ServerNotFound(name.to_string())),
            None => self.get_default_server().ok_or_else(|| {
                ConfigError::ValidationError(
                    "no servers configured; pass --url or add a [[servers]] entry".to_string(),
                )
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn sample_config() -> Config {
        Config {
            default_server: Some("work".to_string()),
            servers: vec![
                Server::new("home", "https://home.example.org"),
                Server::new("work", "https://work.example.org").with_username("alice"),
            ],
            settings: Settings::default(),
        }
    }

    #[test]
    fn test_missing_file_yields_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = sample_config();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_parses_hand_written_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_server = "home"

[[servers]]
name = "home"
url = "http://localhost:8080"

[settings]
request_timeout_secs = 10
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.get_default_server().unwrap().url, "http://localhost:8080");
        assert_eq!(config.settings.request_timeout_secs, 10);
        assert_eq!(config.settings.search_path, DEFAULT_SEARCH_PATH);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "servers = 3").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_duplicate_server_names_rejected() {
        let mut config = sample_config();
        config.servers.push(Server::new("home", "https://other.example.org"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate server name 'home'"));
    }

    #[test]
    fn test_unknown_default_server_rejected() {
        let mut config = sample_config();
        config.default_server = Some("missing".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ServerNotFound(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_search_path_must_be_absolute() {
        let mut config = sample_config();
        config.settings.search_path = "api/TagName".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_server() {
        let config = sample_config();
        assert_eq!(config.resolve_server(None).unwrap().name, "work");
        assert_eq!(config.resolve_server(Some("home")).unwrap().name, "home");
        assert!(matches!(
            config.resolve_server(Some("nope")),
            Err(ConfigError::ServerNotFound(_))
        ));
    }

    #[test]
    fn test_default_server_falls_back_to_first() {
        let mut config = sample_config();
        config.default_server = None;
        assert_eq!(config.get_default_server().unwrap().name, "home");

        assert!(Config::default().resolve_server(None).is_err());
    }

    #[test]
    #[serial]
    fn test_config_path_env_override() {
        std::env::set_var(CONFIG_ENV_VAR, "/tmp/tagbox-test/config.toml");
        let path = Config::config_path().unwrap();
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(path, PathBuf::from("/tmp/tagbox-test/config.toml"));
    }

    #[test]
    #[serial]
    fn test_config_path_default_location() {
        std::env::remove_var(CONFIG_ENV_VAR);
        if let Ok(path) = Config::config_path() {
            assert!(path.ends_with("tagbox/config.toml"));
        }
    }

    #[test]
    fn test_set_username() {
        let mut config = sample_config();
        config.set_username("home", "bob").unwrap();
        assert_eq!(
            config.get_server("home").unwrap().username.as_deref(),
            Some("bob")
        );

        assert!(matches!(
            config.set_username("away", "bob"),
            Err(ConfigError::ServerNotFound(_))
        ));
    }

    #[test]
    fn test_set_invalid_username_leaves_config_unchanged() {
        let mut config = sample_config();
        assert!(matches!(
            config.set_username("work", "a:b"),
            Err(ConfigError::ValidationError(_))
        ));
        assert_eq!(config, sample_config());
    }
}
