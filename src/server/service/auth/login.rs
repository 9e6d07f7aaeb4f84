use crate::server::provider::oauth::{AuthorizationRequest, OAuthClient};

/// Builds the provider login URL and the CSRF state the caller must persist.
pub fn login_service(oauth: &OAuthClient) -> AuthorizationRequest {
    let login = oauth.begin_authorization();

    tracing::debug!("Created login URL for authorization-code flow");

    login
}
