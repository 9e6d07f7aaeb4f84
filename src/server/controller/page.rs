use axum::response::{Html, IntoResponse};

use crate::server::view;

/// Login page
pub async fn index() -> impl IntoResponse {
    Html(view::login_page())
}

/// Confirmation page shown after a successful submission
pub async fn success() -> impl IntoResponse {
    Html(view::success_page())
}
