use serde::Deserialize;

use crate::server::{error::form::FormError, model::auth::AuthenticatedUser};

/// Fields posted by the form on the home page.
///
/// Any other field the client sends, including an `email`, is ignored; the submitter email
/// always comes from the session.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitForm {
    /// Submitter's name as typed.
    pub name: Option<String>,
    /// Pincode as typed.
    pub pincode: Option<String>,
}

/// A single submission forwarded to the row store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    /// Non-blank name, stored as typed.
    pub name: String,
    /// Non-blank pincode.
    pub pincode: String,
    /// Email of the signed-in user.
    pub submitter_email: String,
}

impl FormSubmission {
    /// Builds a submission from posted fields and the authenticated user.
    ///
    /// # Returns
    /// - `Ok(FormSubmission)` - Both fields are present and non-blank
    /// - `Err(FormError::MissingField)` - `name` or `pincode` was absent or blank
    pub fn new(form: SubmitForm, user: &AuthenticatedUser) -> Result<Self, FormError> {
        Ok(Self {
            name: required("name", form.name)?,
            pincode: required("pincode", form.pincode)?,
            submitter_email: user.email.clone(),
        })
    }

    /// Row values in column order: name, pincode, submitter email.
    pub fn to_row(&self) -> [&str; 3] {
        [
            self.name.as_str(),
            self.pincode.as_str(),
            self.submitter_email.as_str(),
        ]
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, FormError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(FormError::MissingField(field)),
    }
}
