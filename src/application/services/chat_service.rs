use std::pin::Pin;
use std::sync::Arc;

use futures::stream::{Stream, StreamExt};

use crate::application::ports::{
    FileLoader, FileLoaderError, InferenceOutput, LlmClient, LlmClientError, LlmTokenStream,
    RepositoryError, SessionRepository,
};
use crate::domain::{Document, DocumentId, LoadedDocument, Message, Session, SessionId};

use super::prompt_builder::build_prompt;

pub type AnswerStream =
    Pin<Box<dyn Stream<Item = Result<String, ChatError>> + Send + 'static>>;

/// Drives one session through upload, question, and answer.
///
/// A question is always recorded before anything can fail. The assistant
/// answer is recorded only once it is complete, so a failed exchange leaves
/// the user's message without a reply.
pub struct ChatService<F, L>
where
    F: FileLoader + ?Sized,
    L: LlmClient + ?Sized,
{
    file_loader: Arc<F>,
    llm_client: Arc<L>,
    session_repository: Arc<dyn SessionRepository>,
    greeting: String,
    streaming: bool,
}

pub enum ChatReply {
    Complete(String),
    Streaming(AnswerStream),
}

#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub document_id: DocumentId,
    pub filename: String,
    pub characters: usize,
}

impl UploadReceipt {
    pub fn has_text(&self) -> bool {
        self.characters > 0
    }
}

impl<F, L> ChatService<F, L>
where
    F: FileLoader + ?Sized,
    L: LlmClient + ?Sized,
{
    pub fn new(
        file_loader: Arc<F>,
        llm_client: Arc<L>,
        session_repository: Arc<dyn SessionRepository>,
        greeting: String,
        streaming: bool,
    ) -> Self {
        Self {
            file_loader,
            llm_client,
            session_repository,
            greeting,
            streaming,
        }
    }

    pub async fn start_session(&self) -> Result<Session, ChatError> {
        let session = Session::with_greeting(&self.greeting);
        self.session_repository.create_session(&session).await?;
        tracing::info!(session_id = %session.id, "Session started");
        Ok(session)
    }

    pub async fn session(&self, id: SessionId) -> Result<Session, ChatError> {
        self.session_repository
            .get_session(id)
            .await?
            .ok_or(ChatError::SessionNotFound(id))
    }

    pub async fn reset_session(&self, id: SessionId) -> Result<(), ChatError> {
        if !self.session_repository.delete_session(id).await? {
            return Err(ChatError::SessionNotFound(id));
        }
        tracing::info!(session_id = %id, "Session reset");
        Ok(())
    }

    #[tracing::instrument(
        skip(self, data, document),
        fields(session_id = %id, filename = %document.filename, bytes = data.len())
    )]
    pub async fn upload_document(
        &self,
        id: SessionId,
        data: &[u8],
        document: Document,
    ) -> Result<UploadReceipt, ChatError> {
        self.session(id).await?;

        let text = self.file_loader.extract_text(data, &document).await?;
        let characters = text.chars().count();

        if characters == 0 {
            tracing::warn!("Document contains no extractable text");
        }

        let loaded = LoadedDocument::new(&document, text);
        self.session_repository.set_document(id, loaded).await?;

        tracing::info!(characters, "Document loaded into session");

        Ok(UploadReceipt {
            document_id: document.id,
            filename: document.filename,
            characters,
        })
    }

    #[tracing::instrument(
        skip(self, question),
        fields(session_id = %id, streaming = self.streaming)
    )]
    pub async fn ask(&self, id: SessionId, question: &str) -> Result<ChatReply, ChatError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatError::EmptyQuestion);
        }

        let session = self.session(id).await?;
        self.session_repository
            .append_message(id, &Message::user(question))
            .await?;

        let context = session.document_text().ok_or_else(|| {
            tracing::warn!("Question received before any document was loaded");
            ChatError::NoDocumentLoaded
        })?;

        let prompt = build_prompt(context, question);

        let output = self
            .llm_client
            .infer(&prompt, self.streaming)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Inference call failed");
                ChatError::InferenceUnavailable(e)
            })?;

        match output {
            InferenceOutput::Complete(answer) => {
                self.session_repository
                    .append_message(id, &Message::assistant(answer.clone()))
                    .await?;
                tracing::info!(answer_chars = answer.len(), "Answer recorded");
                Ok(ChatReply::Complete(answer))
            }
            InferenceOutput::Streaming(tokens) => {
                Ok(ChatReply::Streaming(self.record_when_finished(id, tokens)))
            }
        }
    }

    /// Forwards fragments as they arrive and records the concatenated answer
    /// once the stream ends cleanly.
    fn record_when_finished(&self, id: SessionId, mut tokens: LlmTokenStream) -> AnswerStream {
        let repository = Arc::clone(&self.session_repository);

        Box::pin(async_stream::stream! {
            let mut answer = String::new();

            while let Some(fragment) = tokens.next().await {
                match fragment {
                    Ok(fragment) => {
                        answer.push_str(&fragment);
                        yield Ok(fragment);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, session_id = %id, "Answer stream failed");
                        yield Err(ChatError::InferenceUnavailable(e));
                        return;
                    }
                }
            }

            let answer_chars = answer.len();
            if let Err(e) = repository.append_message(id, &Message::assistant(answer)).await {
                yield Err(ChatError::from(e));
                return;
            }
            tracing::info!(session_id = %id, answer_chars, "Streamed answer recorded");
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),
    #[error("question must not be empty")]
    EmptyQuestion,
    #[error("no document loaded, upload a PDF first")]
    NoDocumentLoaded,
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("unreadable document: {0}")]
    UnreadableDocument(String),
    #[error("inference unavailable: {0}")]
    InferenceUnavailable(LlmClientError),
    #[error("repository: {0}")]
    Repository(RepositoryError),
}

impl ChatError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SessionNotFound(_) => "session_not_found",
            Self::EmptyQuestion => "invalid_request",
            Self::NoDocumentLoaded => "no_document_loaded",
            Self::UnsupportedContentType(_) => "unsupported_content_type",
            Self::UnreadableDocument(_) => "unreadable_document",
            Self::InferenceUnavailable(_) => "inference_unavailable",
            Self::Repository(_) => "internal",
        }
    }
}

impl From<FileLoaderError> for ChatError {
    fn from(e: FileLoaderError) -> Self {
        match e {
            FileLoaderError::UnsupportedContentType(mime) => Self::UnsupportedContentType(mime),
            FileLoaderError::UnreadableDocument(reason) => Self::UnreadableDocument(reason),
        }
    }
}

impl From<RepositoryError> for ChatError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::SessionNotFound(id) => Self::SessionNotFound(id),
            other => Self::Repository(other),
        }
    }
}
