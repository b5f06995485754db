use async_trait::async_trait;

use crate::domain::{LoadedDocument, Message, Session, SessionId};

use super::RepositoryError;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(&self, session: &Session) -> Result<(), RepositoryError>;

    async fn get_session(&self, id: SessionId) -> Result<Option<Session>, RepositoryError>;

    async fn append_message(
        &self,
        id: SessionId,
        message: &Message,
    ) -> Result<(), RepositoryError>;

    async fn set_document(
        &self,
        id: SessionId,
        document: LoadedDocument,
    ) -> Result<(), RepositoryError>;

    async fn delete_session(&self, id: SessionId) -> Result<bool, RepositoryError>;
}
