use axum::{
    extract::{OriginalUri, State},
    response::IntoResponse,
};
use tower_sessions::Session;

use crate::server::{
    controller::util::csrf::take_csrf_state,
    error::Error,
    model::{
        app::AppState,
        auth::{OAuthCredential, UserProfile},
        session::{
            self, auth::SessionAuthCsrf, credential::SessionOAuthCredential,
            profile::SessionUserProfile,
        },
    },
    service::auth::{callback::CallbackService, login::login_service},
    util::redirect::Found,
};

/// Login route to begin sign-in with the identity provider
///
/// Creates the provider's authorization URL, stores its CSRF state in the session and
/// redirects the user to it.
///
/// # Responses
/// - 302 (Found): Redirects user to the provider's sign-in page
/// - 500 (Internal Server Error): The CSRF state could not be stored in session
pub async fn login(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let login = login_service(&state.oauth);

    SessionAuthCsrf::insert(&session, &login.csrf_state).await?;

    Ok(Found(login.url.to_string()))
}

/// Callback route the provider redirects to after the user signs in
///
/// Consumes the CSRF state from the session, exchanges the authorization code for tokens,
/// fetches the user's profile and attaches both to the session.
///
/// # Responses
/// - 302 (Found): Successful login, redirect to `/home`
/// - 400 (Bad Request): CSRF state mismatch, provider denial, or missing code
/// - 502 (Bad Gateway): Token exchange or profile fetch failed
///
/// On any failure an identity left over from an earlier sign-in is removed, so the session
/// ends up anonymous.
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    OriginalUri(uri): OriginalUri,
) -> Result<impl IntoResponse, Error> {
    let (credential, profile) = match authorize(&state, &session, &uri.to_string()).await {
        Ok(signed_in) => signed_in,
        Err(e) => {
            session::sign_out(&session).await?;
            // Server error responses are not persisted by the session layer
            if !session.is_empty().await {
                session.save().await?;
            }
            return Err(e);
        }
    };

    // New identity, new session id
    session.cycle_id().await?;
    SessionOAuthCredential::insert(&session, &credential).await?;
    SessionUserProfile::insert(&session, &profile).await?;

    Ok(Found("/home"))
}

async fn authorize(
    state: &AppState,
    session: &Session,
    received_url: &str,
) -> Result<(OAuthCredential, UserProfile), Error> {
    let expected_state = take_csrf_state(session).await?;

    CallbackService::new(&state.oauth)
        .handle_callback(received_url, &expected_state)
        .await
}

/// Logs the user out by clearing their session
///
/// # Responses
/// - 302 (Found): Logged out, redirect to the login page
/// - 500 (Internal Server Error): The session could not be deleted from the store
pub async fn logout(session: Session) -> Result<impl IntoResponse, Error> {
    session::clear(&session).await?;

    Ok(Found("/"))
}
