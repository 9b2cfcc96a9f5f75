//! Core error types for cogniflow-core.
//!
//! This module defines the error hierarchy using thiserror. Every condition
//! here is recoverable: the caller returns the user to a known state
//! (logged out, or Inactive with no current session) rather than crashing.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for cogniflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Errors talking to the session store / auth service
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors from the session store and auth collaborators.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The bearer token was rejected. The user must log in again.
    #[error("Authorization expired: please log in again")]
    AuthExpired,

    /// The store no longer knows the session id. The local session is
    /// orphaned and must not keep syncing.
    #[error("Session '{id}' not found in the session store")]
    SessionNotFound { id: String },

    /// Transport-level failure (connection refused, timeout, bad body).
    /// Transient: logged and superseded by the next sync tick.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Any other non-success HTTP status
    #[error("Unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// The configured API base URL could not be parsed
    #[error("Invalid API base URL '{0}'")]
    InvalidBaseUrl(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// No config directory could be resolved for this platform
    #[error("Could not determine a configuration directory")]
    NoConfigDir,
}

/// Validation errors, rejected locally before any store call.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A session must have a non-empty subject
    #[error("A study session requires a subject")]
    MissingSubject,

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
