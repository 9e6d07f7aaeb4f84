use tower_sessions::Session;

use crate::server::{
    error::{auth::AuthError, Error},
    model::{
        auth::AuthenticatedUser,
        session::{credential::SessionOAuthCredential, profile::SessionUserProfile},
    },
};

/// Resolves the authenticated user from session.
///
/// # Arguments
/// - `session`: The user's session
///
/// # Returns
/// - `Ok(AuthenticatedUser)`: Credential attached and profile has an email
/// - `Err(Error::AuthError(AuthError::UserNotInSession))`: No credential, no profile, or a
///   profile without an email; responds with a redirect to `/`
/// - `Err(Error)`: Session errors
pub async fn get_user_from_session(session: &Session) -> Result<AuthenticatedUser, Error> {
    if SessionOAuthCredential::get(session).await?.is_none() {
        return Err(Error::AuthError(AuthError::UserNotInSession));
    }

    let Some(profile) = SessionUserProfile::get(session).await? else {
        return Err(Error::AuthError(AuthError::UserNotInSession));
    };

    let Some(user) = AuthenticatedUser::from_profile(profile) else {
        tracing::debug!("Session holds a credential but the profile has no email");

        return Err(Error::AuthError(AuthError::UserNotInSession));
    };

    Ok(user)
}
