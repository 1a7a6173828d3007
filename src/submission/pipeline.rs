use chrono::Utc;

use crate::email::templates;
use crate::error::SubmitError;
use crate::models::Submission;
use crate::sheet::{self, SubmissionRecord};
use crate::state::SharedState;
use crate::storage::UploadOptions;

/// Store the document, record the submission in a spreadsheet and mail it.
///
/// Steps run strictly in order and each runs once. The first failure ends
/// the run.
pub async fn run(state: &SharedState, submission: &Submission) -> Result<(), SubmitError> {
    let config = &state.config;

    let options = UploadOptions::auto(config.upload_folder.clone());
    let stored = state.store.upload(&submission.document, &options).await?;
    tracing::info!(url = %stored.secure_url, "Document uploaded");

    let record = SubmissionRecord::new(submission, &stored, Utc::now(), config.timestamp_offset);
    let spreadsheet = sheet::build_workbook(&record)?;
    tracing::debug!(bytes = spreadsheet.len(), "Spreadsheet built");

    let email = templates::submission_email(
        &config.smtp.from,
        &config.recipient,
        &submission.name,
        spreadsheet,
    );
    state.mailer.send(email).await?;
    tracing::info!(to = %config.recipient, "Notification email sent");

    Ok(())
}
