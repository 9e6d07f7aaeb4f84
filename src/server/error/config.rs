use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::server::error::InternalServerError;

/// Startup configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is unset.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// An environment variable is set but unusable.
    #[error("Invalid value for environment variable {var}: {reason}")]
    InvalidEnvValue {
        /// Variable name.
        var: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// A credentials file is missing or malformed.
    #[error("Failed to read {path}: {reason}")]
    InvalidSecretsFile {
        /// File that failed to load.
        path: String,
        /// Read or parse error.
        reason: String,
    },
    /// A plain-http endpoint was configured while insecure transport is disallowed.
    #[error("Refusing insecure (non-https) URL outside of development: {0}")]
    InsecureTransport(String),
}

impl IntoResponse for ConfigError {
    fn into_response(self) -> Response {
        InternalServerError(self).into_response()
    }
}
