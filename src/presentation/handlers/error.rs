use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::ChatError;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(kind: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                kind: kind.to_string(),
                message: message.into(),
            },
        }
    }
}

pub fn invalid_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("invalid_request", message)),
    )
        .into_response()
}

pub fn status_for(error: &ChatError) -> StatusCode {
    match error {
        ChatError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        ChatError::EmptyQuestion => StatusCode::BAD_REQUEST,
        ChatError::NoDocumentLoaded => StatusCode::CONFLICT,
        ChatError::UnsupportedContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ChatError::UnreadableDocument(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ChatError::InferenceUnavailable(_) => StatusCode::BAD_GATEWAY,
        ChatError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = status_for(&self);

        if status.is_server_error() {
            tracing::error!(error = %self, kind = self.kind(), "Request failed");
        } else {
            tracing::warn!(error = %self, kind = self.kind(), "Request rejected");
        }

        (
            status,
            Json(ErrorResponse::new(self.kind(), self.to_string())),
        )
            .into_response()
    }
}
