//! Error types shared by the client library.

use thiserror::Error;

/// Failure of a backend request.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not signed in")]
    MissingIdentity,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Rejection of a ledger entry before it reaches the ledger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("Name cannot be empty.")]
    EmptyName,

    #[error("Invalid price '{0}'. Please enter a valid number.")]
    InvalidPrice(String),

    #[error("Invalid amount '{0}'. Please enter a valid number.")]
    InvalidQuantity(String),

    #[error("Price cannot be negative.")]
    NegativePrice,

    #[error("Amount cannot be negative.")]
    NegativeQuantity,

    #[error("Amount is too large.")]
    OutOfRange,
}

/// Invalid or missing configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}
