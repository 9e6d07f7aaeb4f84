//! OAuth 2.0 authorization-code client.
//!
//! Wraps the `oauth2` crate's `BasicClient` for the three-legged flow against a configured
//! provider (Google by default): building the authorization URL with a fresh CSRF state,
//! validating the callback and exchanging its code for tokens, and fetching the user's
//! profile with the resulting access token.

use std::{collections::BTreeSet, fs, path::Path};

use chrono::Utc;
use oauth2::{
    basic::BasicClient, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
    EndpointNotSet, EndpointSet, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;
use url::Url;

use crate::server::{
    error::{auth::AuthError, config::ConfigError},
    model::auth::{OAuthCredential, UserProfile},
};

/// Google's authorization endpoint.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
/// Google's token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// Google's user-info endpoint.
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Scopes requested at login: OpenID plus the user's profile and email.
pub const PROFILE_SCOPES: [&str; 3] = [
    "openid",
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
];

type ConfiguredClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// OAuth client credentials as found in a provider's client secrets file.
#[derive(Clone, Deserialize)]
pub struct ClientSecrets {
    /// Public client identifier.
    pub client_id: String,
    /// Confidential client secret.
    pub client_secret: String,
    /// Authorization endpoint, Google's when absent.
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    /// Token endpoint, Google's when absent.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    GOOGLE_AUTH_URL.to_string()
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URL.to_string()
}

#[derive(Deserialize)]
struct ClientSecretsFile {
    web: Option<ClientSecrets>,
    installed: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Reads a client secrets file with either a `web` or an `installed` section.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let invalid = |reason: String| ConfigError::InvalidSecretsFile {
            path: path.display().to_string(),
            reason,
        };

        let contents = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;

        Self::from_json(&contents).map_err(|e| match e {
            ConfigError::InvalidSecretsFile { reason, .. } => invalid(reason),
            other => other,
        })
    }

    /// Parses the JSON contents of a client secrets file.
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidSecretsFile {
            path: "client secrets".to_string(),
            reason,
        };

        let file: ClientSecretsFile =
            serde_json::from_str(contents).map_err(|e| invalid(e.to_string()))?;

        file.web
            .or(file.installed)
            .ok_or_else(|| invalid("expected a \"web\" or \"installed\" section".to_string()))
    }
}

/// Authorization URL to redirect the browser to, and the CSRF state embedded in it.
///
/// The caller is responsible for persisting `csrf_state` until the callback arrives.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    /// Provider URL with client id, scopes, redirect and state.
    pub url: Url,
    /// Random state the callback must echo back.
    pub csrf_state: String,
}

/// Client for the authorization-code flow against a single provider.
#[derive(Clone)]
pub struct OAuthClient {
    client: ConfiguredClient,
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    token_url: String,
    redirect_url: Url,
    userinfo_url: Url,
    scopes: Vec<String>,
}

impl OAuthClient {
    /// Starts building a client; see [`OAuthClientBuilder`].
    pub fn builder() -> OAuthClientBuilder {
        OAuthClientBuilder::default()
    }

    /// Builds the provider's authorization URL with a fresh, unpredictable CSRF state.
    ///
    /// Requests the profile scopes, offline access, and inclusion of previously granted
    /// scopes. Pure construction: nothing is stored or sent.
    pub fn begin_authorization(&self) -> AuthorizationRequest {
        let (url, csrf_state) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(self.scopes.iter().cloned().map(Scope::new))
            .add_extra_param("access_type", "offline")
            .add_extra_param("include_granted_scopes", "true")
            .url();

        AuthorizationRequest {
            url,
            csrf_state: csrf_state.secret().to_string(),
        }
    }

    /// Validates the callback and exchanges its authorization code for tokens.
    ///
    /// The state carried by `received_url` is compared against `expected_csrf_state` before
    /// anything else; no request reaches the provider when they differ.
    ///
    /// # Arguments
    /// - `received_url` - The callback URL as received, absolute or as a path with query
    /// - `expected_csrf_state` - State stored in the session when login began
    ///
    /// # Returns
    /// - `Ok(OAuthCredential)` - Code exchanged successfully
    /// - `Err(AuthError::StateMismatch)` - State missing or different (CSRF or replay)
    /// - `Err(AuthError::AuthorizationDenied)` - Provider returned an `error` parameter
    /// - `Err(AuthError::MissingCode)` - No `code` parameter on the callback
    /// - `Err(AuthError::TokenExchangeFailed)` - Network error or provider rejection
    pub async fn complete_authorization(
        &self,
        received_url: &str,
        expected_csrf_state: &str,
    ) -> Result<OAuthCredential, AuthError> {
        let received = self
            .redirect_url
            .join(received_url)
            .map_err(|e| AuthError::MalformedCallback(e.to_string()))?;

        let mut code = None;
        let mut state = None;
        let mut error = None;
        for (key, value) in received.query_pairs() {
            match key.as_ref() {
                "code" => code = Some(value.into_owned()),
                "state" => state = Some(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                _ => {}
            }
        }

        if state.as_deref() != Some(expected_csrf_state) {
            return Err(AuthError::StateMismatch);
        }
        if let Some(error) = error {
            return Err(AuthError::AuthorizationDenied(error));
        }
        let code = code.ok_or(AuthError::MissingCode)?;

        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .request_async(&self.http)
            .await
            .map_err(|e| AuthError::TokenExchangeFailed(e.to_string()))?;

        // Providers omit `scope` when the grant matches the request.
        let granted_scopes: BTreeSet<String> = match token.scopes() {
            Some(scopes) => scopes.iter().map(|scope| scope.to_string()).collect(),
            None => self.scopes.iter().cloned().collect(),
        };

        Ok(OAuthCredential {
            access_token: token.access_token().secret().to_string(),
            refresh_token: token.refresh_token().map(|t| t.secret().to_string()),
            token_endpoint: self.token_url.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            granted_scopes,
            expires_at: token
                .expires_in()
                .and_then(|d| chrono::Duration::from_std(d).ok())
                .map(|d| Utc::now() + d),
        })
    }

    /// Fetches the signed-in user's profile from the user-info endpoint.
    ///
    /// # Returns
    /// - `Ok(UserProfile)` - Profile returned by the provider
    /// - `Err(AuthError::ProfileFetchFailed)` - Network error, rejected token, or bad body
    pub async fn fetch_profile(
        &self,
        credential: &OAuthCredential,
    ) -> Result<UserProfile, AuthError> {
        let failed = |e: reqwest::Error| AuthError::ProfileFetchFailed(e.to_string());

        self.http
            .get(self.userinfo_url.clone())
            .bearer_auth(&credential.access_token)
            .send()
            .await
            .map_err(failed)?
            .error_for_status()
            .map_err(failed)?
            .json::<UserProfile>()
            .await
            .map_err(failed)
    }
}

/// Builder for [`OAuthClient`].
///
/// Endpoints default to Google's. Unless insecure transport is allowed (development only),
/// every endpoint and the redirect URL must use `https`.
#[derive(Default)]
pub struct OAuthClientBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    auth_url: Option<String>,
    token_url: Option<String>,
    userinfo_url: Option<String>,
    redirect_url: Option<String>,
    allow_insecure_transport: bool,
}

impl OAuthClientBuilder {
    /// Required.
    pub fn client_id(mut self, client_id: &str) -> Self {
        self.client_id = Some(client_id.to_string());
        self
    }

    /// Required.
    pub fn client_secret(mut self, client_secret: &str) -> Self {
        self.client_secret = Some(client_secret.to_string());
        self
    }

    /// Sets client id, secret and both endpoints from a client secrets file.
    pub fn secrets(self, secrets: &ClientSecrets) -> Self {
        self.client_id(&secrets.client_id)
            .client_secret(&secrets.client_secret)
            .auth_url(&secrets.auth_uri)
            .token_url(&secrets.token_uri)
    }

    /// Overrides the authorization endpoint.
    pub fn auth_url(mut self, auth_url: &str) -> Self {
        self.auth_url = Some(auth_url.to_string());
        self
    }

    /// Overrides the token endpoint.
    pub fn token_url(mut self, token_url: &str) -> Self {
        self.token_url = Some(token_url.to_string());
        self
    }

    /// Overrides the user-info endpoint.
    pub fn userinfo_url(mut self, userinfo_url: &str) -> Self {
        self.userinfo_url = Some(userinfo_url.to_string());
        self
    }

    /// Absolute callback URL registered with the provider. Required.
    pub fn redirect_url(mut self, redirect_url: &str) -> Self {
        self.redirect_url = Some(redirect_url.to_string());
        self
    }

    /// Permits plain-http endpoints. Only enabled in development and tests.
    pub fn allow_insecure_transport(mut self, allow: bool) -> Self {
        self.allow_insecure_transport = allow;
        self
    }

    /// Validates the settings and builds the client.
    ///
    /// # Returns
    /// - `Ok(OAuthClient)` - All required settings present and URLs valid
    /// - `Err(ConfigError::MissingEnvVar)` - Client id, secret or redirect URL is unset
    /// - `Err(ConfigError::InsecureTransport)` - An `http` URL without insecure transport allowed
    /// - `Err(ConfigError::InvalidEnvValue)` - A URL does not parse
    pub fn build(self) -> Result<OAuthClient, ConfigError> {
        let client_id = self
            .client_id
            .ok_or_else(|| ConfigError::MissingEnvVar("OAuth client_id".to_string()))?;
        let client_secret = self
            .client_secret
            .ok_or_else(|| ConfigError::MissingEnvVar("OAuth client_secret".to_string()))?;
        let redirect_url = self
            .redirect_url
            .ok_or_else(|| ConfigError::MissingEnvVar("REDIRECT_URI".to_string()))?;
        let auth_url = self.auth_url.unwrap_or_else(default_auth_uri);
        let token_url = self.token_url.unwrap_or_else(default_token_uri);
        let userinfo_url = self
            .userinfo_url
            .unwrap_or_else(|| GOOGLE_USERINFO_URL.to_string());

        let allow_insecure = self.allow_insecure_transport;
        let redirect_url = parse_url("REDIRECT_URI", &redirect_url, allow_insecure)?;
        let userinfo_url = parse_url("userinfo_url", &userinfo_url, allow_insecure)?;
        parse_url("auth_uri", &auth_url, allow_insecure)?;
        parse_url("token_uri", &token_url, allow_insecure)?;

        let invalid = |var: &str, e: url::ParseError| ConfigError::InvalidEnvValue {
            var: var.to_string(),
            reason: e.to_string(),
        };

        let client = BasicClient::new(ClientId::new(client_id.clone()))
            .set_client_secret(ClientSecret::new(client_secret.clone()))
            .set_auth_uri(AuthUrl::new(auth_url).map_err(|e| invalid("auth_uri", e))?)
            .set_token_uri(TokenUrl::new(token_url.clone()).map_err(|e| invalid("token_uri", e))?)
            .set_redirect_uri(
                RedirectUrl::new(redirect_url.to_string())
                    .map_err(|e| invalid("REDIRECT_URI", e))?,
            );

        // Following redirects from the token endpoint would open the client to SSRF.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ConfigError::InvalidEnvValue {
                var: "OAuth HTTP client".to_string(),
                reason: e.to_string(),
            })?;

        Ok(OAuthClient {
            client,
            http,
            client_id,
            client_secret,
            token_url,
            redirect_url,
            userinfo_url,
            scopes: PROFILE_SCOPES.iter().map(|s| s.to_string()).collect(),
        })
    }
}

fn parse_url(var: &str, value: &str, allow_insecure: bool) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidEnvValue {
        var: var.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "https" && !allow_insecure {
        return Err(ConfigError::InsecureTransport(value.to_string()));
    }

    Ok(url)
}
