use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::{FileLoader, LlmClient};
use crate::domain::{Message, Session, SessionId};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub document: Option<DocumentSummary>,
    pub messages: Vec<MessageView>,
}

#[derive(Serialize)]
pub struct DocumentSummary {
    pub document_id: String,
    pub filename: String,
    pub characters: usize,
}

#[derive(Serialize)]
pub struct MessageView {
    pub id: String,
    pub role: &'static str,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.to_string(),
            role: message.role.as_str(),
            content: message.content.clone(),
            created_at: message.created_at,
        }
    }
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id.to_string(),
            document: session.document().map(|d| DocumentSummary {
                document_id: d.document_id.as_uuid().to_string(),
                filename: d.filename.clone(),
                characters: d.text.chars().count(),
            }),
            messages: session.messages().iter().map(MessageView::from).collect(),
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn create_session_handler<F, L>(
    State(state): State<AppState<F, L>>,
) -> impl IntoResponse
where
    F: FileLoader + ?Sized + 'static,
    L: LlmClient + ?Sized + 'static,
{
    match state.chat_service.start_session().await {
        Ok(session) => {
            (StatusCode::CREATED, Json(SessionResponse::from(&session))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[tracing::instrument(skip(state))]
pub async fn session_messages_handler<F, L>(
    State(state): State<AppState<F, L>>,
    Path(session_id): Path<Uuid>,
) -> impl IntoResponse
where
    F: FileLoader + ?Sized + 'static,
    L: LlmClient + ?Sized + 'static,
{
    match state
        .chat_service
        .session(SessionId::from_uuid(session_id))
        .await
    {
        Ok(session) => (StatusCode::OK, Json(SessionResponse::from(&session))).into_response(),
        Err(e) => e.into_response(),
    }
}

#[tracing::instrument(skip(state))]
pub async fn reset_session_handler<F, L>(
    State(state): State<AppState<F, L>>,
    Path(session_id): Path<Uuid>,
) -> impl IntoResponse
where
    F: FileLoader + ?Sized + 'static,
    L: LlmClient + ?Sized + 'static,
{
    match state
        .chat_service
        .reset_session(SessionId::from_uuid(session_id))
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
