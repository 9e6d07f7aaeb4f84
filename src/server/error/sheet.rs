use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors raised by the spreadsheet row store.
#[derive(Error, Debug)]
pub enum SheetError {
    /// The row store could not be opened at startup.
    ///
    /// Only produced while connecting; the server keeps running with the handle absent.
    #[error("Failed to connect to the spreadsheet: {0}")]
    InitFailure(String),
    /// The row store handle is absent because initialization failed.
    #[error("Spreadsheet is unavailable, it failed to connect at startup")]
    Unavailable,
    /// A row could not be appended (connectivity, permissions, API rejection).
    #[error("{0}")]
    AppendFailure(String),
}

impl IntoResponse for SheetError {
    fn into_response(self) -> Response {
        match self {
            Self::InitFailure(_) | Self::Unavailable => {
                tracing::error!("{}", self);

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error: Could not connect to the spreadsheet. Please check server logs.",
                )
                    .into_response()
            }
            Self::AppendFailure(ref message) => {
                tracing::error!("Error writing to spreadsheet: {}", message);

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("An error occurred while submitting your data: {}", message),
                )
                    .into_response()
            }
        }
    }
}
