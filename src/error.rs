use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::email::MailError;
use crate::storage::UploadError;

pub const INVALID_FORM: &str = "Invalid form data";
pub const NO_DOCUMENT: &str = "No document uploaded";
pub const UPLOAD_FAILED: &str = "File upload failed";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong";

/// Every way a submission can fail, from body parsing to mail delivery.
#[derive(Debug)]
pub enum SubmitError {
    InvalidForm(String),
    MissingDocument,
    Upload(UploadError),
    Spreadsheet(rust_xlsxwriter::XlsxError),
    Mail(MailError),
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::InvalidForm(reason) => write!(f, "Invalid form: {reason}"),
            SubmitError::MissingDocument => write!(f, "No document in request"),
            SubmitError::Upload(err) => write!(f, "Upload error: {err}"),
            SubmitError::Spreadsheet(err) => write!(f, "Spreadsheet error: {err}"),
            SubmitError::Mail(err) => write!(f, "Mail error: {err}"),
        }
    }
}

impl std::error::Error for SubmitError {}

impl SubmitError {
    pub fn status(&self) -> StatusCode {
        match self {
            SubmitError::InvalidForm(_) | SubmitError::MissingDocument => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The text the caller sees. Never carries provider details.
    pub fn public_message(&self) -> &'static str {
        match self {
            SubmitError::InvalidForm(_) => INVALID_FORM,
            SubmitError::MissingDocument => NO_DOCUMENT,
            SubmitError::Upload(_) => UPLOAD_FAILED,
            SubmitError::Spreadsheet(_) | SubmitError::Mail(_) => SOMETHING_WENT_WRONG,
        }
    }
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        match &self {
            SubmitError::InvalidForm(_) | SubmitError::MissingDocument => {
                tracing::debug!("Rejected submission: {self}");
            }
            SubmitError::Upload(err) => {
                tracing::error!("Document upload failed: {err}");
            }
            SubmitError::Spreadsheet(err) => {
                tracing::error!("Spreadsheet build failed: {err}");
            }
            SubmitError::Mail(err) => {
                tracing::error!("Notification email failed: {err}");
            }
        }

        (self.status(), self.public_message()).into_response()
    }
}

impl From<UploadError> for SubmitError {
    fn from(err: UploadError) -> Self {
        SubmitError::Upload(err)
    }
}

impl From<rust_xlsxwriter::XlsxError> for SubmitError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        SubmitError::Spreadsheet(err)
    }
}

impl From<MailError> for SubmitError {
    fn from(err: MailError) -> Self {
        SubmitError::Mail(err)
    }
}

/// Response for a handler that panicked.
pub fn panic_response(_: Box<dyn std::any::Any + Send + 'static>) -> Response {
    tracing::error!("Submission handler panicked");
    (StatusCode::INTERNAL_SERVER_ERROR, SOMETHING_WENT_WRONG).into_response()
}
