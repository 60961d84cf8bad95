//! Error types for scopecheck
//!
//! This module defines the error types used throughout the application,
//! using `thiserror` for ergonomic error handling.
//!
//! Note that an unexpected HTTP status from a probe is never an error: it is
//! a normal outcome that the classifier turns into a failed result. Errors
//! are reserved for setup problems and transport-level failures.

use thiserror::Error;

/// Main error type for scopecheck operations
#[derive(Error, Debug)]
pub enum ScopeCheckError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A probe request failed before a status code was received
    /// (DNS failure, refused connection, timeout)
    #[error("Request failed: {0}")]
    Transport(String),

    /// No access token was supplied for a run
    #[error("No access token configured. Set ACCESS_TOKEN or pass --token")]
    MissingToken,

    /// Unknown category name in a filter
    #[error("Unknown category: {0}. Must be one of: org, users, user-groups, teams")]
    InvalidCategory(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for scopecheck operations
///
/// Uses `anyhow::Error` so callers get rich context and `?` propagation.
pub type Result<T> = anyhow::Result<T>;
