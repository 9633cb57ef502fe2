//! Image board server configuration.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};

/// A configured image board server.
///
/// API tokens are stored separately in the OS keychain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Server {
    /// The name of this server entry.
    ///
    /// Must be non-empty and unique across all servers.
    pub name: String,

    /// Base URL of the image board (e.g., "https://images.example.org").
    pub url: String,

    /// Account name used for `Newauth` token authentication.
    ///
    /// Lookups are sent anonymously when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Server {
    /// Create a new server entry.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            username: None,
        }
    }

    /// Set the account name.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Validate this server entry.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` with details if validation fails.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "server name cannot be empty".to_string(),
            ));
        }

        if self.name.contains(char::is_whitespace) {
            return Err(ConfigError::ValidationError(format!(
                "server name '{}' cannot contain whitespace",
                self.name
            )));
        }

        if self.url.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "server '{}': URL cannot be empty",
                self.name
            )));
        }

        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return Err(ConfigError::ValidationError(format!(
                "server '{}': URL must start with http:// or https://",
                self.name
            )));
        }

        if let Some(username) = &self.username {
            if username.is_empty() || username.contains(':') {
                return Err(ConfigError::ValidationError(format!(
                    "server '{}': '{}' is not a valid user name",
                    self.name, username
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_server() {
        let server = Server::new("home", "https://images.example.org");
        assert!(server.validate().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let server = Server::new("", "https://images.example.org");
        let result = server.validate();
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("name cannot be empty"));
    }

    #[test]
    fn test_whitespace_name_rejected() {
        let server = Server::new("my board", "https://images.example.org");
        assert!(server
            .validate()
            .unwrap_err()
            .to_string()
            .contains("cannot contain whitespace"));
    }

    #[test]
    fn test_invalid_url_scheme_rejected() {
        let server = Server::new("home", "images.example.org");
        assert!(server
            .validate()
            .unwrap_err()
            .to_string()
            .contains("must start with http"));
    }

    #[test]
    fn test_http_url_accepted() {
        let server = Server::new("local", "http://localhost:8080");
        assert!(server.validate().is_ok());
    }

    #[test]
    fn test_username_with_colon_rejected() {
        let server = Server::new("home", "https://images.example.org").with_username("a:b");
        assert!(server
            .validate()
            .unwrap_err()
            .to_string()
            .contains("not a valid user name"));
    }

    #[test]
    fn test_server_serialization_skips_missing_username() {
        let server = Server::new("home", "https://images.example.org");
        let toml_str = toml::to_string(&server).unwrap();
        assert!(!toml_str.contains("username"));

        let parsed: Server = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, server);
    }
}
