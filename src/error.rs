//! Error taxonomy for the dedup and classification core.
//!
//! Nothing in here is fatal to a run. Oracle failures are recovered by the
//! caller (singleton groups for dedup, retry candidates for classification),
//! and format failures are recovered per line or per group.

use thiserror::Error;

/// The oracle call itself did not produce text.
#[derive(Debug, Error)]
pub enum OracleFailure {
    /// Network, auth, rate-limit or API-level failure.
    #[error("oracle transport failure: {0}")]
    Transport(String),

    /// The chat template backing the call could not be loaded.
    #[error("oracle template '{name}' unavailable: {reason}")]
    Template { name: String, reason: String },
}

/// The oracle answered, but a line of its answer could not be committed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatFailure {
    #[error("expected 5 relevance fields, found {found}")]
    FieldCount { found: usize },

    #[error("enumeration number {0} is not part of this batch")]
    UnknownEnumeration(usize),
}

/// Rejected pipeline settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read pipeline config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse pipeline config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("importance_threshold must be between 0 and 5, got {0}")]
    Threshold(u8),
}
