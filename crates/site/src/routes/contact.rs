//! Contact form submission.

use axum::{body::Bytes, extract::State};
use tracing::instrument;

use super::Success;
use crate::error::ApiError;
use crate::services::ContactMessage;
use crate::state::AppState;

const SEND_FAILED: &str = "Unable to send message right now.";

/// Parse a submission; an unreadable body counts as an empty form.
fn parse_message(body: &[u8]) -> ContactMessage {
    serde_json::from_slice(body).unwrap_or_default()
}

/// Mail a contact form submission to the sales inbox.
///
/// # Errors
///
/// Returns 400 listing the missing required fields, or 500 if the message
/// cannot be sent.
#[instrument(skip(state, body))]
pub async fn send(State(state): State<AppState>, body: Bytes) -> Result<Success, ApiError> {
    let message = parse_message(&body);

    let missing = message.missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let mailer = state
        .email()
        .ok_or_else(|| ApiError::unavailable(SEND_FAILED, "SMTP is not configured"))?;
    mailer
        .send_contact_message(&message)
        .await
        .map_err(|e| ApiError::unavailable(SEND_FAILED, e))?;

    Ok(Success::new("Message sent successfully."))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use super::*;

    #[test]
    fn test_unreadable_body_is_empty_form() {
        assert_eq!(parse_message(b"not json").missing_fields().len(), 3);
        assert_eq!(
            parse_message(br#"{"type":"Quote","name":"Ali"}"#).missing_fields(),
            vec!["phone"]
        );
    }

    #[test]
    fn test_missing_fields_message() {
        let missing = parse_message(b"{}").missing_fields();
        let error = ApiError::BadRequest(format!("Missing required fields: {}", missing.join(", ")));
        assert_eq!(
            error.to_string(),
            "Missing required fields: type, name, phone"
        );
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
