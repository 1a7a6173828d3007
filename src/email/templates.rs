use lettre::message::Mailbox;

use super::{EmailAttachment, OutgoingEmail};

pub const SUBMISSION_SUBJECT: &str = "New Form Submission";
pub const SPREADSHEET_FILENAME: &str = "submission.xlsx";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub fn render_submission_text(name: &str) -> String {
    format!("New form submission received from {name}.")
}

/// Notification for one submission, carrying its spreadsheet unchanged.
pub fn submission_email(
    from: &Mailbox,
    to: &Mailbox,
    submitter: &str,
    spreadsheet: Vec<u8>,
) -> OutgoingEmail {
    OutgoingEmail {
        from: from.clone(),
        to: to.clone(),
        subject: SUBMISSION_SUBJECT.to_string(),
        text: render_submission_text(submitter),
        attachments: vec![EmailAttachment {
            filename: SPREADSHEET_FILENAME.to_string(),
            content_type: XLSX_CONTENT_TYPE.to_string(),
            content: spreadsheet,
        }],
    }
}
