//! Tag API client and types.
//!
//! This module provides the interface for the image board's tag search REST API.

pub mod auth;
mod client;
pub mod error;
pub mod types;

pub use auth::Auth;
pub use client::TagClient;
pub use error::ApiError;
pub use types::{TagInformation, TagSearchResult};
