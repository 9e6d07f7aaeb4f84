use tower_sessions::Session;

use crate::server::{error::Error, model::auth::UserProfile};

/// Session key the profile is stored under.
pub const SESSION_USER_PROFILE_KEY: &str = "sheetform:user:profile";

/// Session accessor for the profile fetched from the provider after sign-in.
pub struct SessionUserProfile;

impl SessionUserProfile {
    /// Attach the profile to the session
    pub async fn insert(session: &Session, profile: &UserProfile) -> Result<(), Error> {
        session.insert(SESSION_USER_PROFILE_KEY, profile).await?;

        Ok(())
    }

    /// Get the cached profile from session
    pub async fn get(session: &Session) -> Result<Option<UserProfile>, Error> {
        Ok(session.get(SESSION_USER_PROFILE_KEY).await?)
    }

    /// Detach the profile, returning it if one was present
    pub async fn remove(session: &Session) -> Result<Option<UserProfile>, Error> {
        Ok(session.remove(SESSION_USER_PROFILE_KEY).await?)
    }
}
