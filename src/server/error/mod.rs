//! Error types for the Sheetform server application.
//!
//! This module provides the error handling system with specialized error types for each
//! domain (configuration, authentication, form input, spreadsheet row store). All errors
//! implement `IntoResponse` for Axum HTTP responses and use `thiserror` for ergonomic error
//! definitions. Response bodies are plain text since the application serves HTML pages
//! rather than a JSON API.

/// Sign-in errors.
pub mod auth;
/// Configuration errors.
pub mod config;
/// Form input errors.
pub mod form;
/// Row store errors.
pub mod sheet;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::{
    auth::AuthError, config::ConfigError, form::FormError, sheet::SheetError,
};

/// Main error type for the Sheetform server application.
///
/// This enum aggregates all domain-specific error types and external library errors into a
/// single unified error type. It uses `thiserror`'s `#[from]` attribute to enable automatic
/// conversion from underlying error types via the `?` operator. The `IntoResponse` implementation
/// maps errors to appropriate HTTP responses for the browser.
///
/// # Error Categories
/// - Configuration errors (missing/invalid environment variables, insecure transport)
/// - Authentication errors (CSRF state, token exchange, profile fetch, missing session user)
/// - Form errors (missing required fields)
/// - Row store errors (unavailable handle, append failures)
/// - External library errors (sessions, IO)
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Authentication error (CSRF, provider failures, user not in session).
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// Submitted form is missing a required field.
    #[error(transparent)]
    FormError(#[from] FormError),
    /// Spreadsheet row store error (unavailable, append failure).
    #[error(transparent)]
    SheetError(#[from] SheetError),
    /// Session error (session retrieval, storage, serialization).
    #[error(transparent)]
    SessionError(#[from] tower_sessions::session::Error),
    /// IO error (binding the listener, serving requests).
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Converts application errors into HTTP responses.
///
/// Domain errors delegate to their own response mappings; library errors are treated as
/// internal server errors (500) and logged.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::AuthError(err) => err.into_response(),
            Self::FormError(err) => err.into_response(),
            Self::SheetError(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the error message and returns a generic "Internal server error" message to the client
/// so implementation details are not leaked.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}
