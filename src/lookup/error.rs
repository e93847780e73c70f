//! Lookup error types

use thiserror::Error;

/// Errors raised while loading a share's document listing
#[derive(Debug, Error)]
pub enum LookupError {
    /// Slug is empty or contains characters that cannot appear in a path segment
    #[error("Invalid share slug: {0:?}")]
    InvalidSlug(String),

    /// Backend answered with a non-success status
    #[error("Backend returned {status} for share {slug}")]
    Backend { slug: String, status: u16 },

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Listing body could not be decoded
    #[error("Failed to decode document listing: {0}")]
    Decode(String),
}

/// Result type alias for lookup operations
pub type Result<T> = std::result::Result<T, LookupError>;
