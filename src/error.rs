//! Centralized error types for tagbox.
//!
//! Aggregates configuration, API, IO and terminal failures into one type
//! with user-facing messages. The autocomplete widget itself never surfaces
//! errors; these are for the binary's setup and one-shot commands.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// IO errors (file system, stdin, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal-related errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a terminal error.
    pub fn terminal(msg: impl Into<String>) -> Self {
        AppError::Terminal(msg.into())
    }

    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        AppError::Other(msg.into())
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Set TAGBOX_CONFIG or pass --config."
                        .to_string()
                }
                ConfigError::CreateDirError(_) => {
                    "Could not create configuration directory. Check file permissions.".to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Check that it is readable.".to_string()
                }
                ConfigError::WriteError(_) | ConfigError::SerializeError(_) => {
                    "Could not save configuration.".to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
                ConfigError::ServerNotFound(name) => format!("Server '{}' is not configured.", name),
            },
            AppError::Api(e) => match e {
                ApiError::Unauthorized => {
                    "Authentication failed. Please check your user name and API token.".to_string()
                }
                ApiError::Forbidden(msg) => format!("Access denied: {}", msg),
                ApiError::NotFound(resource) => {
                    format!("'{}' was not found. Is the search path correct?", resource)
                }
                ApiError::BadRequest(msg) => format!("The server rejected the request: {}", msg),
                ApiError::RateLimited(Some(ms)) => {
                    format!("Too many requests. Please wait {} ms and try again.", ms)
                }
                ApiError::RateLimited(None) => {
                    "Too many requests. Please wait a moment and try again.".to_string()
                }
                ApiError::ServerError(_) => "Server error. Please try again later.".to_string(),
                ApiError::Network(_) => {
                    "Connection failed. Please check the server URL and your network.".to_string()
                }
                ApiError::InvalidUrl(url) => format!("Invalid server URL '{}'.", url),
                ApiError::Keyring(_) => {
                    "Could not access secure storage. Run 'tagbox login' again.".to_string()
                }
                ApiError::InvalidResponse(_) => {
                    "Unexpected response from the server. Is the URL an image board?".to_string()
                }
            },
            AppError::Io(_) => "An input/output operation failed.".to_string(),
            AppError::Terminal(msg) => format!("Terminal error: {}", msg),
            AppError::Other(msg) => msg.clone(),
        }
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::ServerNotFound(_)) => {
                Some("Add a [[servers]] entry to the configuration file, or pass --url.")
            }
            AppError::Api(ApiError::Unauthorized) => {
                Some("Store a token with 'tagbox login <server> --user <name>'.")
            }
            AppError::Api(ApiError::Network(_)) => Some("Check that the server is reachable."),
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_from_config_error() {
        let app_err: AppError = ConfigError::NoConfigDir.into();
        assert!(matches!(app_err, AppError::Config(ConfigError::NoConfigDir)));
    }

    #[test]
    fn test_app_error_from_api_error() {
        let app_err: AppError = ApiError::Unauthorized.into();
        assert!(matches!(app_err, AppError::Api(ApiError::Unauthorized)));
    }

    #[test]
    fn test_user_message_unauthorized() {
        let msg = AppError::Api(ApiError::Unauthorized).user_message();
        assert!(msg.contains("Authentication failed"));
        assert!(msg.contains("API token"));
    }

    #[test]
    fn test_user_message_server_not_found() {
        let err = AppError::Config(ConfigError::ServerNotFound("home".to_string()));
        assert_eq!(err.user_message(), "Server 'home' is not configured.");
    }

    #[test]
    fn test_user_message_config_validation() {
        let err = AppError::Config(ConfigError::ValidationError(
            "duplicate server name".to_string(),
        ));
        assert!(err.user_message().contains("duplicate server name"));
    }

    #[test]
    fn test_suggested_action_unauthorized() {
        let action = AppError::Api(ApiError::Unauthorized).suggested_action();
        assert!(action.unwrap().contains("tagbox login"));
    }

    #[test]
    fn test_no_suggested_action_for_rate_limit() {
        assert!(AppError::Api(ApiError::RateLimited(None)).suggested_action().is_none());
        let err = AppError::Api(ApiError::RateLimited(Some(750)));
        assert!(err.user_message().contains("750 ms"));
    }

    #[test]
    fn test_terminal_error() {
        let err = AppError::terminal("test error");
        assert_eq!(err.user_message(), "Terminal error: test error");
    }

    #[test]
    fn test_other_error() {
        let err = AppError::other("something went wrong");
        assert_eq!(err.user_message(), "something went wrong");
    }
}
