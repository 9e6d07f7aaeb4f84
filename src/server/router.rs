//! HTTP routing and session middleware.
//!
//! This module defines the application's routes and wraps them in the signed-cookie session
//! layer. Sessions live in a bounded in-memory store; restarting the process signs everyone
//! out.

use axum::{
    routing::{get, post},
    Router,
};
use time::Duration;
use tower_sessions::{cookie::Key, cookie::SameSite, Expiry, SessionManagerLayer};

use crate::server::{
    controller,
    model::{app::AppState, session::store::BoundedMemoryStore},
};

/// Sessions idle for longer than this are expired and eventually deleted from the store.
pub const SESSION_INACTIVITY_LIMIT: Duration = Duration::days(7);

/// Builds the application's HTTP router.
///
/// # Registered Endpoints
/// - `GET /` - Login page
/// - `GET /login` - Redirect to the provider's sign-in page
/// - `GET /callback` - OAuth callback handler
/// - `GET /home` - Form page (signed-in users only)
/// - `POST /submit` - Append the form as a row (signed-in users only)
/// - `GET /success` - Confirmation page
/// - `GET /logout` - Clear the session
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(controller::page::index))
        .route("/login", get(controller::auth::login))
        .route("/callback", get(controller::auth::callback))
        .route("/home", get(controller::form::home))
        .route("/submit", post(controller::form::submit))
        .route("/success", get(controller::page::success))
        .route("/logout", get(controller::auth::logout))
}

/// Builds the complete application: routes, injected state and the session layer.
///
/// # Arguments
/// - `state` - OAuth client and row store handle shared by all handlers
/// - `session_store` - Where session records are kept
/// - `session_key` - Key the session id cookie is signed with
/// - `secure_cookies` - Whether the cookie is only sent over https (production)
pub fn app(
    state: AppState,
    session_store: BoundedMemoryStore,
    session_key: Key,
    secure_cookies: bool,
) -> Router {
    let session = SessionManagerLayer::new(session_store)
        .with_signed(session_key)
        .with_secure(secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(SESSION_INACTIVITY_LIMIT));

    routes().with_state(state).layer(session)
}
