use tower_sessions::Session;

use crate::server::{error::Error, model::auth::OAuthCredential};

/// Session key the credential is stored under.
pub const SESSION_AUTH_CREDENTIAL_KEY: &str = "sheetform:auth:credential";

/// Session accessor for the OAuth credential obtained at callback time.
pub struct SessionOAuthCredential;

impl SessionOAuthCredential {
    /// Attach the credential to the session
    pub async fn insert(session: &Session, credential: &OAuthCredential) -> Result<(), Error> {
        session
            .insert(SESSION_AUTH_CREDENTIAL_KEY, credential)
            .await?;

        Ok(())
    }

    /// Get the credential from session, `None` if the visitor has not signed in
    pub async fn get(session: &Session) -> Result<Option<OAuthCredential>, Error> {
        Ok(session.get(SESSION_AUTH_CREDENTIAL_KEY).await?)
    }

    /// Detach the credential, returning it if one was present
    pub async fn remove(session: &Session) -> Result<Option<OAuthCredential>, Error> {
        Ok(session.remove(SESSION_AUTH_CREDENTIAL_KEY).await?)
    }
}
