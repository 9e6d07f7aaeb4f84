use crate::server::{
    error::Error,
    model::auth::{OAuthCredential, UserProfile},
    provider::oauth::OAuthClient,
};

/// Completes the OAuth callback for a single request.
pub struct CallbackService<'a> {
    oauth: &'a OAuthClient,
}

impl<'a> CallbackService<'a> {
    /// Creates a new instance of CallbackService.
    pub fn new(oauth: &'a OAuthClient) -> Self {
        Self { oauth }
    }

    /// Validates the callback, exchanges the code and fetches the user's profile.
    ///
    /// Nothing is written to the session here; on any error the visitor stays
    /// unauthenticated.
    ///
    /// # Arguments
    /// - `received_url` - Callback path and query as received from the browser
    /// - `expected_csrf_state` - State consumed from the session
    ///
    /// # Returns
    /// - `Ok((OAuthCredential, UserProfile))` - Sign-in completed
    /// - `Err(Error::AuthError)` - State mismatch, provider denial, token exchange or profile
    ///   fetch failure
    pub async fn handle_callback(
        &self,
        received_url: &str,
        expected_csrf_state: &str,
    ) -> Result<(OAuthCredential, UserProfile), Error> {
        let credential = self
            .oauth
            .complete_authorization(received_url, expected_csrf_state)
            .await?;

        let profile = self.oauth.fetch_profile(&credential).await?;

        tracing::info!(
            email = profile.email.as_deref().unwrap_or("<none>"),
            "User signed in"
        );

        Ok((credential, profile))
    }
}
