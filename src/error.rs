use std::path::PathBuf;
use thiserror::Error;

use crate::core::types::SOURCE_TOKENS;

#[derive(Error, Debug)]
pub enum MeowError {
    /// Name could not be resolved by a backend or the registry.
    #[error("Package not found: {0}")]
    NotFound(String),

    #[error("Unknown source '{0}'. Valid sources: {tokens}", tokens = SOURCE_TOKENS.join(", "))]
    UnknownSource(String),

    #[error("Operation cancelled by user")]
    Cancelled,

    /// Nonzero exit or non-2xx response. The diagnostic is kept verbatim.
    #[error("{backend} failed: {diagnostic}")]
    BackendFailure { backend: String, diagnostic: String },

    #[error("Install record store at '{path}' is corrupted: {reason}")]
    StoreCorrupt { path: PathBuf, reason: String },

    #[error("Could not reach {endpoint}: {reason}")]
    TransportError { endpoint: String, reason: String },

    #[error("Admin API key required. Set MEOW_ADMIN_API_KEY environment variable.")]
    MissingApiKey,

    #[error("Invalid package name '{name}': {reason}")]
    InvalidPackageName { name: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error at '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    StdIoError(#[from] std::io::Error),

    #[error("KDL parse error: {0}")]
    KdlError(#[from] kdl::KdlError),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("System command '{command}' failed: {reason}")]
    SystemCommandFailed { command: String, reason: String },

    /// Path resolution or validation error
    #[error("Path error: {0}")]
    PathError(String),

    #[error("{0}")]
    Other(String),
}

impl MeowError {
    /// Classify a reqwest failure: connection problems and timeouts become
    /// `TransportError`, everything else stays an HTTP error.
    pub fn from_transport(endpoint: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            MeowError::TransportError {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            }
        } else {
            MeowError::HttpError(err)
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, MeowError::TransportError { .. })
    }
}

pub type Result<T> = std::result::Result<T, MeowError>;
