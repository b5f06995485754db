use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::application::ports::{RepositoryError, SessionRepository};
use crate::domain::{LoadedDocument, Message, Session, SessionId};

struct Entry {
    session: Session,
    last_active: Instant,
}

/// Process-local session store. Sessions are lost on restart.
///
/// With an idle TTL, a session untouched for that long is treated as ended:
/// lookups no longer see it and the eviction task drops it from memory.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<SessionId, Entry>>,
    idle_ttl: Option<Duration>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::default(),
            idle_ttl: Some(idle_ttl),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops every session idle for at least the TTL. Returns how many went.
    pub async fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry, now));
        before - sessions.len()
    }

    /// Runs `evict_expired` every `period` until the repository is dropped.
    pub fn spawn_eviction(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let repository = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;

            loop {
                interval.tick().await;

                let Some(repository) = repository.upgrade() else {
                    break;
                };

                let evicted = repository.evict_expired().await;
                if evicted > 0 {
                    tracing::info!(evicted, "Evicted idle sessions");
                }
            }
        })
    }

    fn is_expired(&self, entry: &Entry, now: Instant) -> bool {
        self.idle_ttl
            .is_some_and(|ttl| now.duration_since(entry.last_active) >= ttl)
    }

    /// Looks up a session that is still live and marks it active.
    fn live_entry<'a>(
        &self,
        sessions: &'a mut HashMap<SessionId, Entry>,
        id: SessionId,
    ) -> Option<&'a mut Entry> {
        let now = Instant::now();

        if sessions
            .get(&id)
            .is_some_and(|entry| self.is_expired(entry, now))
        {
            sessions.remove(&id);
            tracing::debug!(session_id = %id, "Session expired after inactivity");
            return None;
        }

        let entry = sessions.get_mut(&id)?;
        entry.last_active = now;
        Some(entry)
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create_session(&self, session: &Session) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(RepositoryError::AlreadyExists(session.id));
        }
        sessions.insert(
            session.id,
            Entry {
                session: session.clone(),
                last_active: Instant::now(),
            },
        );
        Ok(())
    }

    async fn get_session(&self, id: SessionId) -> Result<Option<Session>, RepositoryError> {
        let mut sessions = self.sessions.write().await;
        Ok(self
            .live_entry(&mut sessions, id)
            .map(|entry| entry.session.clone()))
    }

    async fn append_message(
        &self,
        id: SessionId,
        message: &Message,
    ) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.write().await;
        let entry = self
            .live_entry(&mut sessions, id)
            .ok_or(RepositoryError::SessionNotFound(id))?;
        entry.session.append(message.clone());
        Ok(())
    }

    async fn set_document(
        &self,
        id: SessionId,
        document: LoadedDocument,
    ) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.write().await;
        let entry = self
            .live_entry(&mut sessions, id)
            .ok_or(RepositoryError::SessionNotFound(id))?;
        entry.session.set_document(document);
        Ok(())
    }

    async fn delete_session(&self, id: SessionId) -> Result<bool, RepositoryError> {
        let now = Instant::now();
        let removed = self.sessions.write().await.remove(&id);
        Ok(removed.is_some_and(|entry| !self.is_expired(&entry, now)))
    }
}
