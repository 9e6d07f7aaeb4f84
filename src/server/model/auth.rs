use std::{collections::BTreeSet, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tokens and client details obtained from a completed authorization-code exchange.
///
/// Created once at callback time and stored in the visitor's session. The refresh token is
/// kept for completeness but never used; expired access tokens are not refreshed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthCredential {
    /// Bearer token for the user-info endpoint.
    pub access_token: String,
    /// Issued only on first consent.
    pub refresh_token: Option<String>,
    /// Endpoint a refresh would be sent to.
    pub token_endpoint: String,
    /// OAuth client the token was issued to.
    pub client_id: String,
    /// Secret of that client.
    pub client_secret: String,
    /// Scopes the provider reported as granted.
    pub granted_scopes: BTreeSet<String>,
    /// Access token expiry, if the provider sent `expires_in`.
    pub expires_at: Option<DateTime<Utc>>,
}

// Tokens and the client secret stay out of logs.
impl fmt::Debug for OAuthCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredential")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[redacted]"))
            .field("token_endpoint", &self.token_endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("granted_scopes", &self.granted_scopes)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Basic profile information returned by the provider's user-info endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Provider account id.
    pub id: Option<String>,
    /// Account email; a profile without one cannot submit.
    pub email: Option<String>,
    /// Reported by the provider, not checked.
    pub verified_email: Option<bool>,
    /// Full display name.
    pub name: Option<String>,
    /// First name.
    pub given_name: Option<String>,
    /// Last name.
    pub family_name: Option<String>,
    /// Avatar URL.
    pub picture: Option<String>,
}

/// A session that holds a credential and a profile with a resolvable email.
///
/// Only this type can supply the submitter email for a form submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Non-empty email taken from the profile.
    pub email: String,
    /// Profile the email came from.
    pub profile: UserProfile,
}

impl AuthenticatedUser {
    /// Builds an authenticated user from a profile, returning `None` without an email.
    pub fn from_profile(profile: UserProfile) -> Option<Self> {
        let email = profile.email.clone().filter(|email| !email.is_empty())?;

        Some(Self { email, profile })
    }

    /// Name shown on the form page, falling back to the email address.
    pub fn display_name(&self) -> &str {
        self.profile.name.as_deref().unwrap_or(&self.email)
    }
}
