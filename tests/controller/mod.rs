//! Tests for HTTP controller endpoints.
//!
//! Handlers are called directly with a session from the test setup, so these cover the
//! controller logic without the session middleware. See `flow` for router-level tests.

mod auth;
mod form;

use std::collections::BTreeSet;

use sheetform::server::model::{
    auth::{OAuthCredential, UserProfile},
    session::{credential::SessionOAuthCredential, profile::SessionUserProfile},
};
use sheetform_test_utils::prelude::*;

/// Attaches a credential and a profile with the given email to the session.
async fn sign_in(test: &TestSetup, email: Option<&str>) {
    let credential = OAuthCredential {
        access_token: TEST_ACCESS_TOKEN.to_string(),
        refresh_token: None,
        token_endpoint: test.token_url(),
        client_id: TEST_CLIENT_ID.to_string(),
        client_secret: TEST_CLIENT_SECRET.to_string(),
        granted_scopes: BTreeSet::from(["openid".to_string()]),
        expires_at: None,
    };
    let profile = UserProfile {
        email: email.map(str::to_string),
        name: Some(TEST_USER_NAME.to_string()),
        ..Default::default()
    };

    SessionOAuthCredential::insert(&test.session, &credential)
        .await
        .unwrap();
    SessionUserProfile::insert(&test.session, &profile)
        .await
        .unwrap();
}
