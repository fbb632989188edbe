use civic_core::{SessionRole, SessionStore, SessionStoreError, SessionToken};
use redis::{AsyncCommands, aio::MultiplexedConnection};

/// Session records as JSON strings under `sess:<role>:<token>`, expiring
/// after the configured TTL.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    role: SessionRole,
    ttl_seconds: u64,
}

impl RedisSessionStore {
    pub fn new(conn: MultiplexedConnection, role: SessionRole, ttl_seconds: u64) -> Self {
        Self {
            conn,
            role,
            ttl_seconds,
        }
    }

    fn key(&self, token: &SessionToken) -> String {
        get_key(self.role, token)
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    fn role(&self) -> SessionRole {
        self.role
    }

    #[tracing::instrument(name = "Reading session from Redis", skip_all)]
    async fn get(
        &self,
        token: &SessionToken,
    ) -> Result<Option<serde_json::Value>, SessionStoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(self.key(token))
            .await
            .map_err(|e| SessionStoreError::Unavailable(e.to_string()))?;

        raw.map(|raw| {
            serde_json::from_str(&raw).map_err(|e| SessionStoreError::Encoding(e.to_string()))
        })
        .transpose()
    }

    #[tracing::instrument(name = "Writing session to Redis", skip_all)]
    async fn set(
        &self,
        token: &SessionToken,
        record: serde_json::Value,
    ) -> Result<(), SessionStoreError> {
        let raw = serde_json::to_string(&record)
            .map_err(|e| SessionStoreError::Encoding(e.to_string()))?;

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(self.key(token), raw, self.ttl_seconds)
            .await
            .map_err(|e| SessionStoreError::Unavailable(e.to_string()))
    }

    #[tracing::instrument(name = "Deleting session from Redis", skip_all)]
    async fn destroy(&self, token: &SessionToken) -> Result<(), SessionStoreError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.key(token))
            .await
            .map_err(|e| SessionStoreError::Unavailable(e.to_string()))
    }
}

// Key prefix keeps roles apart when they share one Redis.
const SESSION_KEY_PREFIX: &str = "sess:";

fn get_key(role: SessionRole, token: &SessionToken) -> String {
    format!("{}{}:{}", SESSION_KEY_PREFIX, role, token.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use testcontainers_modules::{redis::Redis, testcontainers::runners::AsyncRunner};

    #[test]
    fn test_keys_are_scoped_by_role() {
        let token = SessionToken::parse("abc").unwrap();
        assert_eq!(get_key(SessionRole::Website, &token), "sess:website:abc");
        assert_eq!(get_key(SessionRole::Api, &token), "sess:api:abc");
    }

    #[tokio::test]
    #[ignore = "needs a container runtime"]
    async fn test_records_round_trip_through_redis() {
        let container = Redis::default().start().await.unwrap();
        let port = container.get_host_port_ipv4(6379).await.unwrap();
        let client = redis::Client::open(format!("redis://127.0.0.1:{port}/")).unwrap();
        let conn = client.get_multiplexed_async_connection().await.unwrap();

        let website = RedisSessionStore::new(conn.clone(), SessionRole::Website, 60);
        let api = RedisSessionStore::new(conn, SessionRole::Api, 60);
        let token = SessionToken::generate();
        let record = serde_json::json!({ "createdAt": "2025-03-01T12:00:00Z" });

        website.set(&token, record.clone()).await.unwrap();
        assert_eq!(website.get(&token).await.unwrap(), Some(record));
        assert!(api.get(&token).await.unwrap().is_none());

        website.destroy(&token).await.unwrap();
        assert!(website.get(&token).await.unwrap().is_none());
    }
}
