//! Stored upload retrieval.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};

use noble_paints_core::UploadId;

use crate::db::UploadRepository;
use crate::error::{AppError, Result};
use crate::models::Upload;
use crate::state::AppState;

async fn load(state: &AppState, id: &str) -> Result<Upload> {
    let not_found = || AppError::NotFound(format!("upload {id}"));
    let id: UploadId = id.parse().map_err(|_| not_found())?;
    UploadRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(not_found)
}

/// `Content-Disposition` for a download of `filename`.
///
/// The plain `filename` parameter is reduced to safe ASCII; the exact name
/// travels percent-encoded in `filename*`.
fn attachment_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(filename)
    )
}

/// Download an upload under its stored filename.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown or unparseable id.
pub async fn download(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    let upload = load(&state, &id).await?;
    let disposition = HeaderValue::from_str(&attachment_disposition(&upload.filename))
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        upload.data,
    )
        .into_response())
}

/// Show an upload inline as a PDF.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown or unparseable id.
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    let upload = load(&state, &id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "inline"),
        ],
        upload.data,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_disposition_escapes_name() {
        assert_eq!(
            attachment_disposition("catalog 2024.pdf"),
            "attachment; filename=\"catalog 2024.pdf\"; filename*=UTF-8''catalog%202024.pdf"
        );
        let arabic = attachment_disposition("كتالوج.pdf");
        assert!(arabic.starts_with("attachment; filename=\"______.pdf\""));
        assert!(arabic.contains("filename*=UTF-8''%D9%83"));
        assert!(attachment_disposition("a\"b.pdf").contains("filename=\"a_b.pdf\""));
    }
}
