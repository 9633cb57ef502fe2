//! Tag API response types.
//!
//! These types model the JSON returned by the image board's tag endpoints.
//! Field names follow the server's PascalCase encoding.

use serde::{Deserialize, Serialize};

/// A single tag record.
///
/// The server sends many more fields (uploader, alias target, meta-tag
/// details); only the ones useful for completion are kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TagInformation {
    /// The tag name.
    pub name: String,
    /// Free-form description of the tag.
    #[serde(default)]
    pub description: String,
    /// Numeric tag ID.
    #[serde(default, rename = "ID")]
    pub id: u64,
    /// Whether this tag is an alias for another tag.
    #[serde(default)]
    pub is_alias: bool,
}

/// Response body of a tag search.
///
/// Returned by `GET /api/TagName?tagNameQuery=...`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagSearchResult {
    /// Matching tags, in server order.
    ///
    /// The server omits this field or sends `null` when nothing matches.
    #[serde(default)]
    pub tags: Option<Vec<TagInformation>>,
    /// Total number of matches on the server.
    #[serde(default)]
    pub result_count: u64,
    /// Page size the server used.
    #[serde(default)]
    pub server_stride: u64,
}

impl TagSearchResult {
    /// Tag names in response order.
    ///
    /// A missing or null `Tags` field yields an empty list.
    pub fn into_names(self) -> Vec<String> {
        self.tags
            .unwrap_or_default()
            .into_iter()
            .map(|tag| tag.name)
            .collect()
    }
}

/// Error body returned by the image board API on failures.
///
/// Throttled requests also carry a `Timeout` in milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiErrorBody {
    /// Human readable error text.
    pub error: String,
    /// Milliseconds to wait before retrying, sent with HTTP 429.
    #[serde(default)]
    pub timeout: Option<i64>,
}
