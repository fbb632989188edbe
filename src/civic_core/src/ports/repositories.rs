use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    email::Email,
    password::Password,
    session::{SessionRole, SessionToken},
    user::User,
};

// CredentialStore port trait and errors
#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
    #[error("Corrupt credential record: {0}")]
    CorruptRecord(String),
}

impl PartialEq for CredentialStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Unavailable(_), Self::Unavailable(_))
                | (Self::CorruptRecord(_), Self::CorruptRecord(_))
        )
    }
}

/// A stored user together with whatever it needs to check a password.
#[async_trait]
pub trait CredentialRecord: Send + Sync {
    fn user(&self) -> &User;

    /// Compares a candidate against the stored hash. `false` on mismatch or
    /// on a hash that cannot be read.
    async fn verify_password(&self, candidate: &Password) -> bool;
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    type Record: CredentialRecord;

    /// Exact-match lookup. `Ok(None)` means no such user; `Err` means the
    /// store itself could not answer.
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Self::Record>, CredentialStoreError>;
}

// SessionStore port trait and errors
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Session store unavailable: {0}")]
    Unavailable(String),
    #[error("Session record could not be encoded: {0}")]
    Encoding(String),
}

/// Shared token -> record mapping, scoped to one [`SessionRole`].
///
/// Records are opaque JSON to the store; callers decide what a usable record
/// looks like.
#[async_trait]
pub trait SessionStore: Send + Sync {
    fn role(&self) -> SessionRole;

    async fn get(&self, token: &SessionToken)
    -> Result<Option<serde_json::Value>, SessionStoreError>;

    async fn set(
        &self,
        token: &SessionToken,
        record: serde_json::Value,
    ) -> Result<(), SessionStoreError>;

    async fn destroy(&self, token: &SessionToken) -> Result<(), SessionStoreError>;
}
