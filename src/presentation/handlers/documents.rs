use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::{FileLoader, LlmClient};
use crate::domain::{Document, SessionId};
use crate::presentation::state::AppState;

use super::error::invalid_request;

const UPLOAD_OK_MESSAGE: &str = "PDF uploaded and processed successfully!";
const UPLOAD_NO_TEXT_MESSAGE: &str =
    "PDF uploaded, but no extractable text was found. Questions need a PDF with a text layer.";

#[derive(Serialize)]
pub struct UploadResponse {
    pub document_id: String,
    pub filename: String,
    pub characters: usize,
    pub message: String,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn upload_document_handler<F, L>(
    State(state): State<AppState<F, L>>,
    Path(session_id): Path<Uuid>,
    mut multipart: Multipart,
) -> impl IntoResponse
where
    F: FileLoader + ?Sized + 'static,
    L: LlmClient + ?Sized + 'static,
{
    let field = match multipart.next_field().await {
        Ok(Some(f)) => f,
        Ok(None) => return invalid_request("No file uploaded"),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read multipart");
            return invalid_request(format!("Failed to read multipart: {}", e));
        }
    };

    let filename = field.file_name().unwrap_or("upload.pdf").to_string();
    let mime_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let data = match field.bytes().await {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read file bytes");
            return invalid_request(format!("Failed to read file: {}", e));
        }
    };

    tracing::debug!(
        filename = %filename,
        mime_type = %mime_type,
        bytes = data.len(),
        "File received"
    );

    let document = Document::new(filename, mime_type, data.len() as u64);

    match state
        .chat_service
        .upload_document(SessionId::from_uuid(session_id), &data, document)
        .await
    {
        Ok(receipt) => {
            let message = if receipt.has_text() {
                UPLOAD_OK_MESSAGE
            } else {
                UPLOAD_NO_TEXT_MESSAGE
            };
            (
                StatusCode::OK,
                Json(UploadResponse {
                    document_id: receipt.document_id.as_uuid().to_string(),
                    filename: receipt.filename,
                    characters: receipt.characters,
                    message: message.to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}
