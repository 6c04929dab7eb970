//! Error types shared by the catalog and cart modules
//!
//! These never cross the public boundary operations: callers of
//! `search_products`, `fetch_product_detail` and the cart store receive
//! sentinel values (`None`, empty cart) after the error has been logged.

use thiserror::Error;

/// Failures while talking to the upstream shopping-search API
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No API key configured
    #[error("missing upstream API key (set SERPAPI_API_KEY)")]
    MissingApiKey,

    /// Connection, timeout or TLS failure
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not valid JSON
    #[error("malformed upstream response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Valid response without a usable result container
    #[error("no matching results in upstream response")]
    NotFound,
}

/// Failures of the persistent key-value port
#[derive(Error, Debug)]
pub enum StoreError {
    /// Storage cannot be reached at all
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// File system error
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted record could not be encoded or decoded
    #[error("cart record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
