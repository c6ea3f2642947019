//! Error types for the cnvsweb scraper
//!
//! Provides an error enum with human-readable messages and string
//! serialization so API layers can embed errors directly in JSON.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for all cnvsweb scraper operations
///
/// Transport problems (`HttpError`, `RateLimited`) are kept apart from
/// "the page was fine but had nothing in it" (`NotFound`) so callers of the
/// `try_*` operations can tell the two situations apart.
#[derive(Error, Debug)]
pub enum CnvsError {
    /// HTTP request failed (timeout, DNS, connection reset, 5xx)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Failed to parse HTML or JSON content
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Rate limited by server (HTTP 429)
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Page or media reference not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid item ID or query provided
    #[error("Invalid ID: {0}")]
    InvalidId(String),

    /// Unknown content kind filter
    #[error("Invalid kind filter: {0}")]
    InvalidFilter(String),

    /// Login handshake completed but the site did not accept it
    #[error("Login rejected: {0}")]
    LoginRejected(String),
}

impl CnvsError {
    /// Whether the error came from the network rather than from page content
    pub fn is_transport(&self) -> bool {
        matches!(self, CnvsError::HttpError(_) | CnvsError::RateLimited)
    }
}

impl Serialize for CnvsError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for cnvsweb operations
pub type Result<T> = std::result::Result<T, CnvsError>;
