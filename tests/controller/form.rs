use axum::{
    body::to_bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Form,
};
use sheetform::server::{
    controller::form::{home, submit},
    model::form::SubmitForm,
};
use sheetform_test_utils::prelude::*;

use crate::{controller::sign_in, TestSetupExt};

fn form(name: Option<&str>, pincode: Option<&str>) -> SubmitForm {
    SubmitForm {
        name: name.map(str::to_string),
        pincode: pincode.map(str::to_string),
    }
}

#[tokio::test]
/// Expect the form page to greet the signed-in user
async fn home_shows_form_for_signed_in_user() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    sign_in(&test, Some(TEST_USER_EMAIL)).await;

    let resp = home(test.session.clone()).await.unwrap().into_response();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains(TEST_USER_EMAIL));
    assert!(body.contains(r#"action="/submit""#));

    Ok(())
}

#[tokio::test]
/// Expect a profile without an email to be treated as signed out
async fn home_redirects_without_email() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    sign_in(&test, None).await;

    let resp = home(test.session.clone()).await.err().unwrap().into_response();

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "/");

    Ok(())
}

#[tokio::test]
/// Expect one row (name, pincode, session email) and a redirect to the success page
async fn submit_appends_row() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_worksheet()
        .with_append_endpoint(["Jo", "12345", TEST_USER_EMAIL], 1)
        .build()
        .await?;
    let state = test.app_state().await;
    sign_in(&test, Some(TEST_USER_EMAIL)).await;

    let resp = submit(
        State(state),
        test.session.clone(),
        Ok(Form(form(Some("Jo"), Some("12345")))),
    )
    .await
    .unwrap()
    .into_response();

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "/success");
    test.assert_mocks();

    Ok(())
}

#[tokio::test]
/// Expect an anonymous submission to redirect without touching the row store
async fn submit_redirects_when_signed_out() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_worksheet()
        .with_append_endpoint(["Jo", "12345", TEST_USER_EMAIL], 0)
        .build()
        .await?;
    let state = test.app_state().await;

    let resp = submit(
        State(state),
        test.session.clone(),
        Ok(Form(form(Some("Jo"), Some("12345")))),
    )
    .await
    .err()
    .unwrap()
    .into_response();

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "/");
    test.assert_mocks();

    Ok(())
}

#[tokio::test]
async fn submit_rejects_missing_name() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_worksheet()
        .with_append_endpoint(["", "12345", TEST_USER_EMAIL], 0)
        .build()
        .await?;
    let state = test.app_state().await;
    sign_in(&test, Some(TEST_USER_EMAIL)).await;

    let resp = submit(
        State(state),
        test.session.clone(),
        Ok(Form(form(None, Some("12345")))),
    )
    .await
    .err()
    .unwrap()
    .into_response();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    test.assert_mocks();

    Ok(())
}

#[tokio::test]
/// Expect the API's message to be shown to the user on append failure
async fn submit_reports_append_failure() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_worksheet()
        .with_failing_append_endpoint()
        .build()
        .await?;
    let state = test.app_state().await;
    sign_in(&test, Some(TEST_USER_EMAIL)).await;

    let resp = submit(
        State(state),
        test.session.clone(),
        Ok(Form(form(Some("Jo"), Some("12345")))),
    )
    .await
    .err()
    .unwrap()
    .into_response();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8_lossy(&body);
    assert!(body.starts_with("An error occurred while submitting your data: "));
    assert!(body.contains("PERMISSION_DENIED"));

    Ok(())
}
