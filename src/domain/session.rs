use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::{DocumentId, LoadedDocument, Message, SessionId};

/// One user's chat: the message log and the document it is asking about.
///
/// The message log only grows. Uploading a new document replaces the live
/// document wholesale; earlier uploads are remembered by id only.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    messages: Vec<Message>,
    document: Option<LoadedDocument>,
    ingested_documents: HashSet<DocumentId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            messages: Vec::new(),
            document: None,
            ingested_documents: HashSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_greeting(greeting: &str) -> Self {
        let mut session = Self::new();
        if !greeting.trim().is_empty() {
            session.append(Message::assistant(greeting.trim()));
        }
        session
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn set_document(&mut self, document: LoadedDocument) {
        self.ingested_documents.insert(document.document_id);
        self.document = Some(document);
        self.updated_at = Utc::now();
    }

    pub fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    /// The live document text, if an upload produced any.
    pub fn document_text(&self) -> Option<&str> {
        self.document
            .as_ref()
            .filter(|d| d.has_text())
            .map(|d| d.text.as_str())
    }

    pub fn has_ingested(&self, document_id: DocumentId) -> bool {
        self.ingested_documents.contains(&document_id)
    }

    pub fn ingested_count(&self) -> usize {
        self.ingested_documents.len()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
