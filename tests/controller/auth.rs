use axum::{
    extract::{OriginalUri, State},
    http::{header, StatusCode, Uri},
    response::IntoResponse,
};
use sheetform::server::{
    controller::auth::{callback, login, logout},
    model::session::{auth::SessionAuthCsrf, is_authenticated},
};
use sheetform_test_utils::prelude::*;

use crate::{controller::sign_in, TestSetupExt};

#[tokio::test]
/// Expect the stored state to be the one sent to the provider
async fn login_stores_state_sent_to_provider() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;

    let resp = login(State(test.app_state().await), test.session.clone())
        .await
        .unwrap()
        .into_response();

    assert_eq!(resp.status(), StatusCode::FOUND);
    let location = url::Url::parse(resp.headers()[header::LOCATION].to_str().unwrap()).unwrap();
    let sent_state = location
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned());
    let stored_state = SessionAuthCsrf::get(&test.session).await.unwrap();
    assert!(sent_state.is_some());
    assert_eq!(sent_state, stored_state);

    Ok(())
}

#[tokio::test]
/// Expect a callback replayed after a successful login to be rejected
async fn callback_state_is_single_use() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_token_endpoint(1)
        .with_userinfo_endpoint(Some(TEST_USER_EMAIL), 1)
        .build()
        .await?;
    let state = test.app_state().await;
    SessionAuthCsrf::insert(&test.session, "S").await.unwrap();
    let uri = Uri::from_static("/callback?code=abc&state=S");

    let first = callback(
        State(state.clone()),
        test.session.clone(),
        OriginalUri(uri.clone()),
    )
    .await;
    let second = callback(State(state), test.session.clone(), OriginalUri(uri)).await;

    assert!(first.is_ok());
    let resp = second.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    test.assert_mocks();

    Ok(())
}

#[tokio::test]
/// Expect a provider denial to be a 400 without any token request
async fn callback_rejects_provider_denial() -> Result<(), TestError> {
    let test = TestBuilder::new().with_token_endpoint(0).build().await?;
    SessionAuthCsrf::insert(&test.session, "S").await.unwrap();
    let uri = Uri::from_static("/callback?error=access_denied&state=S");

    let result = callback(
        State(test.app_state().await),
        test.session.clone(),
        OriginalUri(uri),
    )
    .await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    test.assert_mocks();

    Ok(())
}

#[tokio::test]
/// Expect a 502 when the provider rejects the code
async fn callback_fails_when_exchange_rejected() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_failing_token_endpoint()
        .build()
        .await?;
    SessionAuthCsrf::insert(&test.session, "S").await.unwrap();
    let uri = Uri::from_static("/callback?code=used&state=S");

    let result = callback(
        State(test.app_state().await),
        test.session.clone(),
        OriginalUri(uri),
    )
    .await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert!(!is_authenticated(&test.session).await.unwrap());

    Ok(())
}

#[tokio::test]
/// Expect logout of an anonymous session to still redirect to the login page
async fn logout_without_session_redirects() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;

    let resp = logout(test.session.clone()).await.unwrap().into_response();

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "/");

    Ok(())
}

#[tokio::test]
async fn logout_signs_user_out() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    sign_in(&test, Some(TEST_USER_EMAIL)).await;

    logout(test.session.clone()).await.unwrap();

    assert!(!is_authenticated(&test.session).await.unwrap());

    Ok(())
}
