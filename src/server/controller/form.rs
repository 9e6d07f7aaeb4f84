use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, IntoResponse},
    Form,
};
use tower_sessions::Session;

use crate::server::{
    controller::util::get_user::get_user_from_session,
    error::{form::FormError, Error},
    model::{app::AppState, form::SubmitForm},
    service::submission::SubmissionService,
    util::redirect::Found,
    view,
};

/// Form page for signed-in users
///
/// # Responses
/// - 200 (OK): Form greeting the signed-in user
/// - 302 (Found): Not signed in, redirect to the login page
pub async fn home(session: Session) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&session).await?;

    Ok(Html(view::home_page(&user)))
}

/// Appends the posted form as a row alongside the signed-in user's email
///
/// The session is checked before the body so an anonymous POST always redirects, whatever
/// it carries. Any `email` field in the body is ignored.
///
/// # Responses
/// - 302 (Found): Row appended, redirect to `/success`; or not signed in, redirect to `/`
/// - 400 (Bad Request): `name` or `pincode` missing
/// - 500 (Internal Server Error): Row store unavailable or append failed, with the message
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    form: Result<Form<SubmitForm>, FormRejection>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&session).await?;

    let Form(form) = form.map_err(|e| FormError::Unreadable(e.body_text()))?;

    SubmissionService::new(state.worksheet.as_deref())
        .submit(form, &user)
        .await?;

    Ok(Found("/success"))
}
