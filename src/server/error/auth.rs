use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::util::redirect::Found;

const LOGIN_FAILED_MESSAGE: &str = "There was an issue logging you in, please try again.";

/// Sign-in and session errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Answered with a redirect to the login page.
    #[error("No authenticated user with an email is present in session")]
    UserNotInSession,
    /// The callback's `state` does not match the one stored at login.
    #[error("Failed to login user due to CSRF state mismatch")]
    StateMismatch,
    /// The callback carried an `error` parameter.
    #[error("Provider denied the authorization request: {0}")]
    AuthorizationDenied(String),
    /// The callback has neither `code` nor `error`.
    #[error("Callback did not include an authorization code")]
    MissingCode,
    /// The callback URL could not be parsed.
    #[error("Callback URL could not be parsed: {0}")]
    MalformedCallback(String),
    /// The token endpoint rejected the code or was unreachable.
    #[error("Failed to exchange authorization code for tokens: {0}")]
    TokenExchangeFailed(String),
    /// The user-info endpoint failed after a successful exchange.
    #[error("Failed to fetch user profile: {0}")]
    ProfileFetchFailed(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::UserNotInSession => {
                tracing::debug!("{}", self);

                Found("/").into_response()
            }
            Self::StateMismatch | Self::MissingCode | Self::MalformedCallback(_) => {
                tracing::debug!("Authentication error: {}", self);

                (StatusCode::BAD_REQUEST, LOGIN_FAILED_MESSAGE).into_response()
            }
            Self::AuthorizationDenied(ref reason) => {
                tracing::debug!(reason = %reason, "{}", self);

                (
                    StatusCode::BAD_REQUEST,
                    "Sign-in was cancelled or denied, please try again.",
                )
                    .into_response()
            }
            Self::TokenExchangeFailed(_) | Self::ProfileFetchFailed(_) => {
                tracing::error!("{}", self);

                (StatusCode::BAD_GATEWAY, LOGIN_FAILED_MESSAGE).into_response()
            }
        }
    }
}
