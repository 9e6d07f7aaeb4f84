use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// A `302 Found` redirect to a path or an absolute URL.
///
/// Axum's `Redirect` only offers 303, 307 and 308; browsers follow a 302 after a form POST
/// with a GET, which is what the submit flow relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Found<L>(pub L);

impl<L: AsRef<str>> IntoResponse for Found<L> {
    fn into_response(self) -> Response {
        (StatusCode::FOUND, [(header::LOCATION, self.0.as_ref())]).into_response()
    }
}
