use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use civic_core::{SessionRole, SessionStore, SessionStoreError, SessionToken};

/// In-process session store. Records never expire.
#[derive(Clone)]
pub struct HashMapSessionStore {
    role: SessionRole,
    records: Arc<RwLock<HashMap<SessionToken, serde_json::Value>>>,
}

impl HashMapSessionStore {
    pub fn new(role: SessionRole) -> Self {
        Self {
            role,
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl SessionStore for HashMapSessionStore {
    fn role(&self) -> SessionRole {
        self.role
    }

    async fn get(
        &self,
        token: &SessionToken,
    ) -> Result<Option<serde_json::Value>, SessionStoreError> {
        Ok(self.records.read().await.get(token).cloned())
    }

    async fn set(
        &self,
        token: &SessionToken,
        record: serde_json::Value,
    ) -> Result<(), SessionStoreError> {
        self.records.write().await.insert(token.clone(), record);
        Ok(())
    }

    async fn destroy(&self, token: &SessionToken) -> Result<(), SessionStoreError> {
        self.records.write().await.remove(token);
        Ok(())
    }
}
