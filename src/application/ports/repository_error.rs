use crate::domain::SessionId;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),
    #[error("session already exists: {0}")]
    AlreadyExists(SessionId),
}
