//! End-to-end tests through the full router, session middleware included.
//!
//! Each step forwards the session cookie from the previous response, the way a browser
//! would.

use axum::{
    body::{to_bytes, Body},
    http::StatusCode,
    Router,
};
use sheetform::server::{model::session::store::BoundedMemoryStore, router};
use mockito::Matcher;
use sheetform_test_utils::prelude::*;
use tower::ServiceExt;
use tower_sessions::cookie::Key;

use crate::{
    util::{form_request, location, request, session_cookie},
    TestSetupExt,
};

async fn app(test: &TestSetup) -> Router {
    router::app(
        test.app_state().await,
        BoundedMemoryStore::default(),
        Key::generate(),
        false,
    )
}

async fn body_text(response: axum::response::Response) -> String {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8_lossy(&body).into_owned()
}

/// Runs `/login`, returning the session cookie and the state sent to the provider.
async fn begin_login(app: &Router, cookie: Option<&str>) -> (String, String) {
    let resp = app
        .clone()
        .oneshot(request("GET", "/login", cookie, Body::empty()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    let cookie = session_cookie(&resp)
        .or(cookie.map(str::to_string))
        .expect("login sets the session cookie");
    let provider_url = url::Url::parse(location(&resp)).unwrap();
    let state = provider_url
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .unwrap();

    (cookie, state)
}

/// Runs `/login` and `/callback`, returning the signed-in session cookie.
async fn sign_in(app: &Router) -> String {
    let (cookie, state) = begin_login(app, None).await;

    let callback = format!("/callback?code=abc&state={}", state);
    let resp = app
        .clone()
        .oneshot(request("GET", &callback, Some(&cookie), Body::empty()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/home");

    session_cookie(&resp).unwrap_or(cookie)
}

#[tokio::test]
/// Sign in, submit the form, and land on the success page with one row appended
async fn signs_in_and_submits_row() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_token_endpoint(1)
        .with_userinfo_endpoint(Some(TEST_USER_EMAIL), 1)
        .with_worksheet()
        .with_append_endpoint(["Jo", "12345", TEST_USER_EMAIL], 1)
        .build()
        .await?;
    let app = app(&test).await;

    let cookie = sign_in(&app).await;

    let resp = app
        .clone()
        .oneshot(request("GET", "/home", Some(&cookie), Body::empty()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains(TEST_USER_EMAIL));

    // A client-supplied email is ignored in favor of the session's
    let resp = app
        .clone()
        .oneshot(form_request(
            "/submit",
            Some(&cookie),
            "name=Jo&pincode=12345&email=forged%40evil.com",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/success");

    let resp = app
        .clone()
        .oneshot(request("GET", "/success", Some(&cookie), Body::empty()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    test.assert_mocks();

    Ok(())
}

#[tokio::test]
/// Expect the session to be unusable after logout, even when its cookie is replayed
async fn logout_ends_session() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_token_endpoint(1)
        .with_userinfo_endpoint(Some(TEST_USER_EMAIL), 1)
        .with_worksheet()
        .with_append_endpoint(["Jo", "12345", TEST_USER_EMAIL], 0)
        .build()
        .await?;
    let app = app(&test).await;
    let cookie = sign_in(&app).await;

    let resp = app
        .clone()
        .oneshot(request("GET", "/logout", Some(&cookie), Body::empty()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");

    let resp = app
        .clone()
        .oneshot(request("GET", "/home", Some(&cookie), Body::empty()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");

    // The replayed cookie must not be able to write a row
    let resp = app
        .clone()
        .oneshot(form_request("/submit", Some(&cookie), "name=Jo&pincode=12345"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    test.assert_mocks();

    Ok(())
}

#[tokio::test]
/// Expect a failed re-login to leave the session signed out rather than keep the old user
async fn failed_relogin_signs_out() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_token_endpoint(1)
        .with_userinfo_endpoint(Some(TEST_USER_EMAIL), 1)
        .build()
        .await?;
    let app = app(&test).await;
    let cookie = sign_in(&app).await;
    let (cookie, _) = begin_login(&app, Some(&cookie)).await;

    let resp = app
        .clone()
        .oneshot(request(
            "GET",
            "/callback?code=x&state=forged",
            Some(&cookie),
            Body::empty(),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let cookie = session_cookie(&resp).unwrap_or(cookie);

    let resp = app
        .clone()
        .oneshot(request("GET", "/home", Some(&cookie), Body::empty()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    test.assert_mocks();

    Ok(())
}

#[tokio::test]
/// Expect a provider failure during re-login to sign out the earlier user as well
async fn failed_token_exchange_on_relogin_signs_out() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_mock_endpoint(|server| {
            server
                .mock("POST", "/oauth2/token")
                .match_body(Matcher::UrlEncoded("code".to_string(), "bad".to_string()))
                .with_status(400)
                .with_header("content-type", "application/json")
                .with_body(r#"{"error":"invalid_grant"}"#)
                .expect(1)
                .create()
        })
        .with_token_endpoint(1)
        .with_userinfo_endpoint(Some(TEST_USER_EMAIL), 1)
        .build()
        .await?;
    let app = app(&test).await;
    let cookie = sign_in(&app).await;
    let (cookie, state) = begin_login(&app, Some(&cookie)).await;

    let callback = format!("/callback?code=bad&state={}", state);
    let resp = app
        .clone()
        .oneshot(request("GET", &callback, Some(&cookie), Body::empty()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let resp = app
        .clone()
        .oneshot(request("GET", "/home", Some(&cookie), Body::empty()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    test.assert_mocks();

    Ok(())
}

#[tokio::test]
/// Expect a 500 with the fixed message when the spreadsheet failed to connect at startup
async fn submit_fails_when_spreadsheet_unavailable() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_token_endpoint(1)
        .with_userinfo_endpoint(Some(TEST_USER_EMAIL), 1)
        .with_service_token_endpoint()
        .with_forbidden_spreadsheet()
        .build()
        .await?;
    let app = app(&test).await;
    let cookie = sign_in(&app).await;

    let resp = app
        .clone()
        .oneshot(form_request("/submit", Some(&cookie), "name=Jo&pincode=12345"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_text(resp).await,
        "Error: Could not connect to the spreadsheet. Please check server logs."
    );

    Ok(())
}

#[tokio::test]
/// Expect signed-in pages to redirect anonymous visitors to the login page
async fn anonymous_requests_redirect_to_login() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let app = app(&test).await;

    let resp = app
        .clone()
        .oneshot(request("GET", "/home", None, Body::empty()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");

    let resp = app
        .clone()
        .oneshot(form_request("/submit", None, "name=Jo&pincode=12345"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");

    Ok(())
}

#[tokio::test]
/// Expect the login page to link to the sign-in route
async fn index_links_to_login() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let app = app(&test).await;

    let resp = app
        .oneshot(request("GET", "/", None, Body::empty()))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains(r#"href="/login""#));

    Ok(())
}

#[tokio::test]
/// Expect a callback from a session that never started a login to be rejected
async fn callback_without_login_is_rejected() -> Result<(), TestError> {
    let test = TestBuilder::new().with_token_endpoint(0).build().await?;
    let app = app(&test).await;

    let resp = app
        .oneshot(request(
            "GET",
            "/callback?code=abc&state=S",
            None,
            Body::empty(),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    test.assert_mocks();

    Ok(())
}
