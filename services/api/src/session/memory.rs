use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use models::Session;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::SessionStore;
use crate::store::StoreResult;

/// Sessions kept in process memory. Lost on restart.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: Uuid, ttl: chrono::Duration) -> StoreResult<Session> {
        let session = Session::new(user_id, ttl);
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| !s.is_expired());
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(&id).filter(|s| !s.is_expired()).cloned())
    }

    async fn destroy(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.sessions.write().await.remove(&id).is_some())
    }

    async fn destroy_for_user(&self, user_id: Uuid) -> StoreResult<u64> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.user_id != user_id);
        Ok((before - sessions.len()) as u64)
    }
}
