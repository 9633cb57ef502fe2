//! Authentication handling for the tag API.
//!
//! The image board accepts an API token in a `Newauth <user>:<token>`
//! header. Tokens live in the OS keyring, keyed by server name.

use super::error::{ApiError, Result};

/// The keyring service name for tagbox tokens.
const KEYRING_SERVICE: &str = "tagbox";

/// Authentication credentials for a server.
#[derive(Clone)]
pub struct Auth {
    /// The account name.
    username: String,
    /// The complete authorization header value.
    auth_header: String,
}

impl Auth {
    /// Create credentials from a user name and API token.
    pub fn new(username: &str, token: &str) -> Self {
        Self {
            username: username.to_string(),
            auth_header: build_auth_header(username, token),
        }
    }

    /// Create credentials using the token stored for `server_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be retrieved from the keyring.
    pub fn from_keyring(server_name: &str, username: &str) -> Result<Self> {
        let token = get_token(server_name)?;
        Ok(Self::new(username, &token))
    }

    /// Get the authorization header value for HTTP requests.
    pub fn header_value(&self) -> &str {
        &self.auth_header
    }

    /// Get the account name.
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Build the `Newauth` header value.
fn build_auth_header(username: &str, token: &str) -> String {
    format!("Newauth {}:{}", username, token)
}

/// Store an API token in the OS keyring.
///
/// # Errors
///
/// Returns an error if the token cannot be stored in the keyring.
pub fn store_token(server_name: &str, token: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, server_name)
        .map_err(|e| ApiError::Keyring(format!("failed to create keyring entry: {}", e)))?;

    entry
        .set_password(token)
        .map_err(|e| ApiError::Keyring(format!("failed to store token: {}", e)))?;

    Ok(())
}

/// Retrieve an API token from the OS keyring.
///
/// # Errors
///
/// Returns an error if the token cannot be retrieved from the keyring.
pub fn get_token(server_name: &str) -> Result<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, server_name)
        .map_err(|e| ApiError::Keyring(format!("failed to access keyring: {}", e)))?;

    entry
        .get_password()
        .map_err(|e| ApiError::Keyring(format!("failed to retrieve token: {}", e)))
}

/// Delete an API token from the OS keyring.
///
/// # Errors
///
/// Returns an error if the token cannot be deleted from the keyring.
pub fn delete_token(server_name: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, server_name)
        .map_err(|e| ApiError::Keyring(format!("failed to access keyring: {}", e)))?;

    entry
        .delete_password()
        .map_err(|e| ApiError::Keyring(format!("failed to delete token: {}", e)))?;

    Ok(())
}
