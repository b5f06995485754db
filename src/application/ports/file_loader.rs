use async_trait::async_trait;

use crate::domain::Document;

/// Turns uploaded bytes into plain text.
///
/// An upload that parses but carries no text yields `Ok(String::new())`.
#[async_trait]
pub trait FileLoader: Send + Sync {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FileLoaderError {
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("unreadable document: {0}")]
    UnreadableDocument(String),
}
