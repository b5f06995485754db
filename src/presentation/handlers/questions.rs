use std::convert::Infallible;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::{FileLoader, LlmClient};
use crate::application::services::{
    AnswerStream, ChatReply, OutputFormat, TypingRenderer, format_response,
};
use crate::domain::SessionId;
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::error::ErrorResponse;

#[derive(Deserialize)]
pub struct QuestionRequest {
    pub question: String,
    #[serde(default)]
    pub format: Option<OutputFormat>,
    #[serde(default)]
    pub typing: bool,
}

#[derive(Serialize)]
pub struct AnswerResponse {
    pub answer: String,
    pub formatted: String,
}

/// Answers a question about the session's document.
///
/// A complete answer is returned as JSON, or replayed as SSE `replace` frames
/// when `typing` is set. With streaming inference enabled the answer arrives
/// as SSE `fragment` events followed by one `done` event carrying the
/// formatted text. `typing` has no effect then: the fragments already reveal
/// the answer as it is generated.
#[tracing::instrument(skip(state, request), fields(typing = request.typing))]
pub async fn ask_handler<F, L>(
    State(state): State<AppState<F, L>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<QuestionRequest>,
) -> Response
where
    F: FileLoader + ?Sized + 'static,
    L: LlmClient + ?Sized + 'static,
{
    tracing::debug!(question = %sanitize_prompt(&request.question), "Processing question");

    let format = request.format.unwrap_or(state.default_format);

    let reply = match state
        .chat_service
        .ask(SessionId::from_uuid(session_id), &request.question)
        .await
    {
        Ok(reply) => reply,
        Err(e) => return e.into_response(),
    };

    match reply {
        ChatReply::Complete(answer) => {
            let formatted = format_response(&answer, format);
            if request.typing {
                typing_response(state.typing_renderer, &formatted)
            } else {
                (StatusCode::OK, Json(AnswerResponse { answer, formatted })).into_response()
            }
        }
        ChatReply::Streaming(fragments) => {
            if request.typing {
                tracing::debug!("Typing effect skipped for a streamed answer");
            }
            streaming_response(fragments, format)
        }
    }
}

fn typing_response(renderer: TypingRenderer, formatted: &str) -> Response {
    let events = renderer
        .frames(formatted)
        .map(|frame| Ok::<_, Infallible>(Event::default().event("replace").data(frame)));

    Sse::new(events).keep_alive(KeepAlive::default()).into_response()
}

fn streaming_response(fragments: AnswerStream, format: OutputFormat) -> Response {
    Sse::new(fragment_events(fragments, format))
        .keep_alive(KeepAlive::default())
        .into_response()
}

fn fragment_events(
    mut fragments: AnswerStream,
    format: OutputFormat,
) -> impl Stream<Item = Result<Event, Infallible>> + Send + 'static {
    async_stream::stream! {
        let mut answer = String::new();

        while let Some(fragment) = fragments.next().await {
            match fragment {
                Ok(fragment) => {
                    answer.push_str(&fragment);
                    yield Ok(Event::default().event("fragment").data(fragment));
                }
                Err(e) => {
                    let body = ErrorResponse::new(e.kind(), e.to_string());
                    let data = serde_json::to_string(&body).unwrap_or_default();
                    yield Ok(Event::default().event("error").data(data));
                    return;
                }
            }
        }

        let done = AnswerResponse {
            formatted: format_response(&answer, format),
            answer,
        };
        let data = serde_json::to_string(&done).unwrap_or_default();
        yield Ok(Event::default().event("done").data(data));
    }
}
