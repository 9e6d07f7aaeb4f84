use crate::server::{
    error::{sheet::SheetError, Error},
    model::{
        auth::AuthenticatedUser,
        form::{FormSubmission, SubmitForm},
    },
    provider::sheets::{AppendAck, Worksheet},
};

/// Forwards form submissions to the row store.
pub struct SubmissionService<'a> {
    worksheet: Option<&'a Worksheet>,
}

impl<'a> SubmissionService<'a> {
    /// Creates a new instance of SubmissionService.
    ///
    /// # Arguments
    /// - `worksheet` - Row store handle, `None` when it failed to connect at startup
    pub fn new(worksheet: Option<&'a Worksheet>) -> Self {
        Self { worksheet }
    }

    /// Appends the submission as a new row alongside the user's email.
    ///
    /// The handle is checked before the form so that an unavailable row store fails every
    /// submission the same way.
    ///
    /// # Returns
    /// - `Ok(AppendAck)` - Exactly one row appended
    /// - `Err(Error::SheetError(SheetError::Unavailable))` - Row store handle is absent
    /// - `Err(Error::FormError)` - `name` or `pincode` missing
    /// - `Err(Error::SheetError(SheetError::AppendFailure))` - Append failed
    pub async fn submit(
        &self,
        form: SubmitForm,
        user: &AuthenticatedUser,
    ) -> Result<AppendAck, Error> {
        let worksheet = self.worksheet.ok_or(SheetError::Unavailable)?;

        let submission = FormSubmission::new(form, user)?;
        let ack = worksheet.append(&submission).await?;

        tracing::info!(
            submitter = %submission.submitter_email,
            updated_range = ack.updates.updated_range.as_deref().unwrap_or(""),
            "Appended form submission"
        );

        Ok(ack)
    }
}
