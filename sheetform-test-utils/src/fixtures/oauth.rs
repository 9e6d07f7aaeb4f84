//! Identity provider endpoints: authorization-code exchange and user info.

use std::time::Duration;

use mockito::{Matcher, Mock};
use oauth2::{
    basic::{BasicTokenResponse, BasicTokenType},
    AccessToken, EmptyExtraTokenFields, RefreshToken, Scope,
};
use serde_json::{json, Value};

use crate::{
    constant::{TEST_ACCESS_TOKEN, TEST_REFRESH_TOKEN, TEST_USER_NAME},
    TestSetup,
};

impl TestSetup {
    pub fn oauth<'a>(&'a mut self) -> OAuthFixtures<'a> {
        OAuthFixtures { setup: self }
    }
}

pub struct OAuthFixtures<'a> {
    setup: &'a mut TestSetup,
}

/// Token response for a successful code exchange, valid for an hour.
pub fn mock_token_response() -> BasicTokenResponse {
    let mut token = BasicTokenResponse::new(
        AccessToken::new(TEST_ACCESS_TOKEN.to_string()),
        BasicTokenType::Bearer,
        EmptyExtraTokenFields {},
    );
    token.set_expires_in(Some(&Duration::from_secs(3599)));
    token.set_refresh_token(Some(RefreshToken::new(TEST_REFRESH_TOKEN.to_string())));
    token.set_scopes(Some(vec![
        Scope::new("openid".to_string()),
        Scope::new("https://www.googleapis.com/auth/userinfo.email".to_string()),
        Scope::new("https://www.googleapis.com/auth/userinfo.profile".to_string()),
    ]));

    token
}

/// User-info body; `email` is omitted entirely when `None`.
pub fn mock_profile_body(email: Option<&str>) -> Value {
    let mut profile = json!({
        "id": "108234567890",
        "verified_email": email.is_some(),
        "name": TEST_USER_NAME,
        "given_name": "Test",
        "family_name": "User",
        "picture": "https://example.com/avatar.png",
    });
    if let Some(email) = email {
        profile["email"] = json!(email);
    }

    profile
}

impl<'a> OAuthFixtures<'a> {
    /// Token endpoint that accepts any authorization code.
    ///
    /// # Arguments
    /// - `expected_requests` - Number of code exchanges the test should perform
    pub fn create_token_endpoint(&mut self, expected_requests: usize) -> Mock {
        let body = serde_json::to_string(&mock_token_response()).unwrap();

        self.setup
            .server
            .mock("POST", "/oauth2/token")
            .match_body(Matcher::UrlEncoded(
                "grant_type".to_string(),
                "authorization_code".to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(expected_requests)
            .create()
    }

    /// Token endpoint rejecting the code as already used or expired.
    pub fn create_failing_token_endpoint(&mut self) -> Mock {
        self.setup
            .server
            .mock("POST", "/oauth2/token")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "error": "invalid_grant",
                    "error_description": "Bad Request",
                })
                .to_string(),
            )
            .expect(1)
            .create()
    }

    /// User-info endpoint that only answers requests bearing the mock access token.
    pub fn create_userinfo_endpoint(
        &mut self,
        email: Option<&str>,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("GET", "/oauth2/v2/userinfo")
            .match_header(
                "authorization",
                Matcher::Exact(format!("Bearer {}", TEST_ACCESS_TOKEN)),
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(mock_profile_body(email).to_string())
            .expect(expected_requests)
            .create()
    }

    pub fn create_failing_userinfo_endpoint(&mut self) -> Mock {
        self.setup
            .server
            .mock("GET", "/oauth2/v2/userinfo")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "error": {
                        "code": 401,
                        "message": "Request had invalid authentication credentials.",
                        "status": "UNAUTHENTICATED",
                    }
                })
                .to_string(),
            )
            .expect(1)
            .create()
    }
}
