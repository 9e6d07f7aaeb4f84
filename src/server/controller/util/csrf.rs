use tower_sessions::Session;

use crate::server::{
    error::{auth::AuthError, Error},
    model::session::auth::SessionAuthCsrf,
};

/// Removes the CSRF state stored at login and returns it for validation.
///
/// A callback arriving without a pending login is treated as a state mismatch.
pub async fn take_csrf_state(session: &Session) -> Result<String, Error> {
    match SessionAuthCsrf::remove(session).await? {
        Some(state) => Ok(state),
        None => Err(Error::AuthError(AuthError::StateMismatch)),
    }
}
