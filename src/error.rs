//! Error handling module for kernel-meta
//!
//! The resolution engine never fails: it degrades to an empty answer.
//! These errors belong to the package-database edge around it (reading
//! snapshots, running `dpkg-query`). Configuration goes through `anyhow`.

use thiserror::Error;

/// Main error type for kernel-meta
#[derive(Error, Debug)]
pub enum KernelMetaError {
    /// IO errors (snapshot files, child process pipes)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Package database query errors (dpkg-query missing or failing)
    #[error("Package query failed: {0}")]
    Query(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for kernel-meta operations
pub type Result<T> = std::result::Result<T, KernelMetaError>;

impl KernelMetaError {
    /// Create a package query error
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }
}
