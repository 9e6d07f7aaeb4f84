//! Extensions on the shared test setup for building application state and requests.

use axum::{
    body::Body,
    http::{header, Request, Response},
};
use sheetform::server::{
    model::app::AppState,
    provider::{
        oauth::OAuthClient,
        sheets::{ServiceAccountKey, Worksheet},
    },
};
use sheetform_test_utils::{constant::*, TestSetup};

/// Extension trait wiring the mock server into the application's clients.
pub trait TestSetupExt {
    fn oauth_client(&self) -> OAuthClient;
    async fn worksheet(&self) -> Option<Worksheet>;
    async fn app_state(&self) -> AppState;
}

impl TestSetupExt for TestSetup {
    fn oauth_client(&self) -> OAuthClient {
        OAuthClient::builder()
            .client_id(TEST_CLIENT_ID)
            .client_secret(TEST_CLIENT_SECRET)
            .auth_url(&self.auth_url())
            .token_url(&self.token_url())
            .userinfo_url(&self.userinfo_url())
            .redirect_url(TEST_CALLBACK_URL)
            .allow_insecure_transport(true)
            .build()
            .expect("Failed to build OAuth client")
    }

    /// Opens the mock spreadsheet, `None` when the mock server refuses it.
    async fn worksheet(&self) -> Option<Worksheet> {
        let key = ServiceAccountKey::from_json(&self.service_account_json().to_string())
            .expect("Failed to parse mock service account");

        Worksheet::open(key, TEST_SPREADSHEET_ID, &self.server.url())
            .await
            .ok()
    }

    async fn app_state(&self) -> AppState {
        AppState::new(self.oauth_client(), self.worksheet().await)
    }
}

/// Builds a request carrying the session cookie, if any.
pub fn request(method: &str, uri: &str, cookie: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    builder.body(body).expect("Failed to build request")
}

pub fn form_request(uri: &str, cookie: Option<&str>, form: &str) -> Request<Body> {
    let mut request = request("POST", uri, cookie, Body::from(form.to_string()));
    request.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/x-www-form-urlencoded"),
    );

    request
}

/// The `name=value` pair of the session cookie set by a response, if it set one.
pub fn session_cookie<B>(response: &Response<B>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .next()
        .map(str::to_string)
}

pub fn location<B>(response: &Response<B>) -> &str {
    response.headers()[header::LOCATION]
        .to_str()
        .expect("Location header is not a string")
}
