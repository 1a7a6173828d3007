use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::Instrument;

use crate::error::SubmitError;
use crate::state::SharedState;
use crate::submission::{fields, parser, pipeline};

pub const SUCCESS: &str = "Form submitted and email sent!";

pub async fn submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, SubmitError> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    let form = if content_type.is_some_and(|ct| ct.contains("multipart/form-data")) {
        parser::parse_multipart(&headers, body)
            .await
            .map_err(SubmitError::InvalidForm)?
    } else {
        parser::parse_body(content_type, &body).map_err(SubmitError::InvalidForm)?
    };

    let submission = fields::validate(&form)?;

    let span = tracing::info_span!(
        "submission",
        id = %submission.id,
        document_bytes = submission.document.len(),
    );
    pipeline::run(&state, &submission).instrument(span).await?;

    Ok((StatusCode::OK, SUCCESS).into_response())
}
