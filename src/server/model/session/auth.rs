//! Authentication session data models.
//!
//! This module provides a type-safe wrapper for storing and retrieving the CSRF state token
//! in the session during the OAuth authentication flow. The token is generated when login
//! begins, stored in the session, and consumed during the OAuth callback to prove the
//! callback corresponds to a login this server initiated.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::server::error::Error;

/// Session key for storing the CSRF state token.
pub const SESSION_AUTH_CSRF_KEY: &str = "sheetform:auth:csrf";

/// Session wrapper for CSRF state token storage.
#[derive(Default, Deserialize, Serialize, Debug)]
pub struct SessionAuthCsrf(pub String);

impl SessionAuthCsrf {
    /// Inserts the CSRF state token into the session, replacing any previous one.
    ///
    /// # Arguments
    /// - `session` - User's session for storing the CSRF token
    /// - `state` - CSRF state token to store
    ///
    /// # Returns
    /// - `Ok(())` - CSRF token successfully stored in session
    /// - `Err(Error)` - Session storage failed (serialization error)
    pub async fn insert(session: &Session, state: &str) -> Result<(), Error> {
        session
            .insert(SESSION_AUTH_CSRF_KEY, SessionAuthCsrf(state.to_string()))
            .await?;

        Ok(())
    }

    /// Retrieves the CSRF state token from the session without removing it.
    ///
    /// # Returns
    /// - `Ok(Some(String))` - CSRF token present in session
    /// - `Ok(None)` - No login has been started in this session
    /// - `Err(Error)` - Session retrieval failed
    pub async fn get(session: &Session) -> Result<Option<String>, Error> {
        Ok(session
            .get::<SessionAuthCsrf>(SESSION_AUTH_CSRF_KEY)
            .await?
            .map(|SessionAuthCsrf(state)| state))
    }

    /// Removes and returns the CSRF state token from the session.
    ///
    /// Ensures the token can only be used once, so a replayed callback fails validation.
    ///
    /// # Returns
    /// - `Ok(Some(String))` - CSRF token found, removed, and returned
    /// - `Ok(None)` - No CSRF token in session
    /// - `Err(Error)` - Session operation failed
    pub async fn remove(session: &Session) -> Result<Option<String>, Error> {
        Ok(session
            .remove::<SessionAuthCsrf>(SESSION_AUTH_CSRF_KEY)
            .await?
            .map(|SessionAuthCsrf(state)| state))
    }
}
