use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors in a submitted form body, all answered with 400.
#[derive(Error, Debug)]
pub enum FormError {
    /// A required field is absent or blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    /// The body is not a urlencoded form.
    #[error("Form body could not be read: {0}")]
    Unreadable(String),
}

impl IntoResponse for FormError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}
