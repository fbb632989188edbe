pub mod hashmap_credential_store;
pub mod hashmap_session_store;
pub mod postgres_credential_store;
pub mod redis_session_store;

pub use hashmap_credential_store::{HashMapCredentialStore, StoredCredential};
pub use hashmap_session_store::HashMapSessionStore;
pub use postgres_credential_store::PostgresCredentialStore;
pub use redis_session_store::RedisSessionStore;
