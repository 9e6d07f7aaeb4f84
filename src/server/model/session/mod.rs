//! Session data models and utilities.
//!
//! This module provides type-safe wrappers for session data storage and retrieval using
//! tower-sessions. Each submodule defines a specific piece of session state (CSRF state,
//! OAuth credential, cached profile) with methods for inserting, retrieving, and removing
//! it. Every field is optional so "credential absent" is a checked state rather than a
//! missing key. Sessions are resolved or created per request by the session layer.

pub mod auth;
/// OAuth credential in session.
pub mod credential;
/// Cached user profile in session.
pub mod profile;
pub mod store;

use tower_sessions::Session;

use crate::server::{
    error::Error,
    model::session::{credential::SessionOAuthCredential, profile::SessionUserProfile},
};

/// Returns whether an OAuth credential is attached to the session.
pub async fn is_authenticated(session: &Session) -> Result<bool, Error> {
    Ok(SessionOAuthCredential::get(session).await?.is_some())
}

/// Detaches the signed-in identity (credential and profile), leaving the session itself.
pub async fn sign_out(session: &Session) -> Result<(), Error> {
    SessionOAuthCredential::remove(session).await?;
    SessionUserProfile::remove(session).await?;

    Ok(())
}

/// Removes all attached state from the session and deletes it from the store (logout).
///
/// The stored record is deleted too, so a replayed cookie resolves to an empty session.
/// Sessions that hold no data are left untouched; flushing them would create a store
/// entry for a visitor who never had one.
pub async fn clear(session: &Session) -> Result<(), Error> {
    if !session.is_empty().await {
        session.flush().await?;
    }

    Ok(())
}
