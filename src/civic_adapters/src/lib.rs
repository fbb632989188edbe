pub mod config;
pub mod hashing;
pub mod persistence;
pub mod telemetry;

pub use persistence::{
    HashMapCredentialStore, HashMapSessionStore, PostgresCredentialStore, RedisSessionStore,
    StoredCredential,
};
pub use telemetry::TracingLoginObserver;
