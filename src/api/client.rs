//! Tag API client implementation.
//!
//! This module provides the client for the image board's tag-name search
//! endpoint. Each lookup is a single GET request; there is no retry, since a
//! newer keystroke will supersede a failed lookup anyway.

use std::time::Duration;

use reqwest::{header, Client, Response, StatusCode};
use tracing::{debug, info, instrument, warn};

use super::auth::Auth;
use super::error::{ApiError, Result};
use super::types::{ApiErrorBody, TagSearchResult};
use crate::config::{Server, Settings};

/// Query parameter carrying the seed word.
const QUERY_PARAM: &str = "tagNameQuery";

/// The tag API client.
#[derive(Debug, Clone)]
pub struct TagClient {
    /// The HTTP client.
    client: Client,
    /// The base URL of the image board.
    base_url: String,
    /// Path of the tag-name search endpoint.
    search_path: String,
    /// Optional token credentials.
    auth: Option<Auth>,
}

impl TagClient {
    /// Create a client for a configured server.
    ///
    /// When the server has a user name, the token is read from the OS
    /// keyring. A missing token is logged and the client falls back to
    /// anonymous requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    #[instrument(skip(server, settings), fields(server_name = %server.name))]
    pub fn new(server: &Server, settings: &Settings) -> Result<Self> {
        info!("Creating tag client for server");

        let auth = match &server.username {
            Some(username) => match Auth::from_keyring(&server.name, username) {
                Ok(auth) => Some(auth),
                Err(e) => {
                    warn!("No token for '{}', continuing anonymously: {}", username, e);
                    None
                }
            },
            None => None,
        };

        let client = Self::build_http_client(settings.request_timeout_secs)?;
        Self::from_parts(client, &server.url, &settings.search_path, auth)
    }

    /// Create a client with explicit credentials.
    ///
    /// Use this for testing or one-off lookups. Uses the default timeout.
    pub fn with_credentials(base_url: &str, search_path: &str, auth: Option<Auth>) -> Result<Self> {
        let client = Self::build_http_client(Settings::default().request_timeout_secs)?;
        Self::from_parts(client, base_url, search_path, auth)
    }

    fn from_parts(
        client: Client,
        base_url: &str,
        search_path: &str,
        auth: Option<Auth>,
    ) -> Result<Self> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
            search_path: search_path.to_string(),
            auth,
        })
    }

    /// Build the HTTP client with appropriate settings.
    fn build_http_client(timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(ApiError::Network)
    }

    /// Build the lookup URL for a seed word.
    fn search_url(&self, seed: &str) -> String {
        format!(
            "{}{}?{}={}",
            self.base_url,
            self.search_path,
            QUERY_PARAM,
            urlencoding::encode(seed)
        )
    }

    /// Search for tag names completing `seed`.
    ///
    /// Calls `GET <search_path>?tagNameQuery=<seed>` and returns the tag
    /// names in server order. A response without a `Tags` field is an
    /// empty result, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or a body
    /// that is not a tag search result.
    #[instrument(skip(self), fields(seed = %seed))]
    pub async fn search_tag_names(&self, seed: &str) -> Result<Vec<String>> {
        let result = self.search_tags(seed).await?;
        let names = result.into_names();
        debug!("Found {} tag names", names.len());
        Ok(names)
    }

    /// Search for tags completing `seed`, returning the full result.
    pub async fn search_tags(&self, seed: &str) -> Result<TagSearchResult> {
        let url = self.search_url(seed);

        let mut request = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json");
        if let Some(auth) = &self.auth {
            request = request.header(header::AUTHORIZATION, auth.header_value());
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Handle the HTTP response, checking for errors and parsing JSON.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T> {
        let status = response.status();
        let url = response.url().path().to_string();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
        } else {
            let error_body = response.text().await.unwrap_or_default();
            debug!("Error response body: {}", error_body);

            Err(Self::error_from_response(status, &url, &error_body))
        }
    }

    /// Create an appropriate error from an HTTP response.
    ///
    /// The image board replies with `{"Error": "..."}` on failures, plus a
    /// `Timeout` when the request was throttled.
    fn error_from_response(status: StatusCode, url: &str, body: &str) -> ApiError {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) if status == StatusCode::TOO_MANY_REQUESTS => {
                ApiError::RateLimited(parsed.timeout.and_then(|ms| u64::try_from(ms).ok()))
            }
            Ok(parsed) if !parsed.error.is_empty() => ApiError::from_status(status, &parsed.error),
            _ => ApiError::from_status(status, url),
        }
    }

    /// Whether requests carry an authorization header.
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }
}

/// Normalize the base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim_end_matches('/');

    if !url.starts_with("https://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!("URL does not use HTTPS: {}. Tokens will be sent in clear text.", url);
    }

    url.to_string()
}
