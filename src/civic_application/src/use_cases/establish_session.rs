use civic_core::{SessionStore, SessionStoreError, SessionToken, Udo};

use super::session_serializer::{SessionSerializer, SessionSerializerError};

#[derive(Debug, thiserror::Error)]
pub enum EstablishSessionError {
    #[error("Session store error: {0}")]
    SessionStoreError(#[from] SessionStoreError),
    #[error("Session serializer error: {0}")]
    SessionSerializerError(#[from] SessionSerializerError),
}

/// Writes a session record for a freshly authenticated identity.
pub struct EstablishSessionUseCase<S>
where
    S: SessionStore,
{
    session_store: S,
    serializer: SessionSerializer,
}

impl<S> EstablishSessionUseCase<S>
where
    S: SessionStore,
{
    pub fn new(session_store: S) -> Self {
        Self {
            session_store,
            serializer: SessionSerializer,
        }
    }

    /// # Returns
    /// The new session token, to be handed to the client.
    #[tracing::instrument(name = "EstablishSessionUseCase::execute", skip_all, fields(uid = %udo.id))]
    pub async fn execute(&self, udo: &Udo) -> Result<SessionToken, EstablishSessionError> {
        let token = SessionToken::generate();
        let record = self.serializer.record_for(udo)?;

        self.session_store.set(&token, record).await?;

        tracing::debug!(role = %self.session_store.role(), "Session established");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_core::{SessionRole, UserId};
    use std::{collections::HashMap, sync::Arc};
    use tokio::sync::RwLock;

    #[derive(Clone, Default)]
    struct MockSessionStore {
        records: Arc<RwLock<HashMap<String, serde_json::Value>>>,
    }

    #[async_trait::async_trait]
    impl SessionStore for MockSessionStore {
        fn role(&self) -> SessionRole {
            SessionRole::Website
        }

        async fn get(
            &self,
            token: &SessionToken,
        ) -> Result<Option<serde_json::Value>, SessionStoreError> {
            Ok(self.records.read().await.get(token.as_str()).cloned())
        }

        async fn set(
            &self,
            token: &SessionToken,
            record: serde_json::Value,
        ) -> Result<(), SessionStoreError> {
            self.records
                .write()
                .await
                .insert(token.as_str().to_string(), record);
            Ok(())
        }

        async fn destroy(&self, token: &SessionToken) -> Result<(), SessionStoreError> {
            self.records.write().await.remove(token.as_str());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_session_record_restores_to_the_same_identity() {
        let store = MockSessionStore::default();
        let use_case = EstablishSessionUseCase::new(store.clone());
        let udo = Udo {
            id: UserId::new(),
            email: "jane@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            full_name: "Jane Doe".to_string(),
        };

        let token = use_case.execute(&udo).await.unwrap();

        let stored = store.get(&token).await.unwrap().unwrap();
        assert_eq!(SessionSerializer.restore(stored).unwrap(), Some(udo));
    }

    #[tokio::test]
    async fn test_each_login_gets_a_fresh_token() {
        let store = MockSessionStore::default();
        let use_case = EstablishSessionUseCase::new(store.clone());
        let udo = Udo {
            id: UserId::new(),
            email: "jane@example.com".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            full_name: String::new(),
        };

        let first = use_case.execute(&udo).await.unwrap();
        let second = use_case.execute(&udo).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.records.read().await.len(), 2);
    }
}
