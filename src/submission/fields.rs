use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::error::SubmitError;
use crate::models::{Document, Submission};

use super::parser::RawForm;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z ]{3,}$").expect("valid name pattern"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone pattern"));

pub const DOCUMENT_FIELD: &str = "document";

/// Field names on the wire, primary name first.
const NAME_FIELDS: &[&str] = &["name"];
const DOB_FIELDS: &[&str] = &["dob", "dateOfBirth"];
const PHONE_FIELDS: &[&str] = &["phone"];
const ID_FIELDS: &[&str] = &["ssn", "idNumber"];

fn lookup<'a>(form: &'a RawForm, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|n| form.field(n))
}

/// Check the submitted fields and document, in order, and build a `Submission`.
///
/// Date of birth and id number only need to be non-empty. Their format is
/// deliberately left unchecked.
pub fn validate(form: &RawForm) -> Result<Submission, SubmitError> {
    let name = lookup(form, NAME_FIELDS)
        .filter(|s| NAME_RE.is_match(s))
        .ok_or_else(|| SubmitError::InvalidForm("name must be 3+ letters or spaces".into()))?;

    let date_of_birth = lookup(form, DOB_FIELDS)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SubmitError::InvalidForm("date of birth is required".into()))?;

    let phone = lookup(form, PHONE_FIELDS)
        .filter(|s| PHONE_RE.is_match(s))
        .ok_or_else(|| SubmitError::InvalidForm("phone must be exactly 10 digits".into()))?;

    let id_number = lookup(form, ID_FIELDS)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SubmitError::InvalidForm("id number is required".into()))?;

    let file = form
        .file(DOCUMENT_FIELD)
        .ok_or(SubmitError::MissingDocument)?;

    Ok(Submission {
        id: Uuid::now_v7(),
        name: name.to_string(),
        date_of_birth: date_of_birth.to_string(),
        phone: phone.to_string(),
        id_number: id_number.to_string(),
        document: Document {
            file_name: Some(file.file_name.clone()).filter(|n| !n.is_empty()),
            content_type: file
                .content_type
                .clone()
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            bytes: file.bytes.clone(),
        },
    })
}
