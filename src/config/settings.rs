//! Application settings configuration.

use serde::{Deserialize, Serialize};

/// Path of the tag-name search endpoint on the image board.
pub const DEFAULT_SEARCH_PATH: &str = "/api/TagName";

/// Application-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Endpoint path appended to the server URL for tag lookups.
    pub search_path: String,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Event loop tick rate in milliseconds.
    pub tick_rate_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            request_timeout_secs: 30,
            tick_rate_ms: 100,
        }
    }
}
