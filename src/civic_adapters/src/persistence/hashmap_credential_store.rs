use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use civic_core::{CredentialRecord, CredentialStore, CredentialStoreError, Email, Password, User};
use secrecy::Secret;

use crate::hashing::{HashingError, compute_password_hash, verify_password_hash};

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("User already exists")]
    UserAlreadyExists,
    #[error(transparent)]
    Hashing(#[from] HashingError),
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

/// A user together with its argon2 password hash.
#[derive(Clone)]
pub struct StoredCredential {
    user: User,
    password_hash: Secret<String>,
}

impl StoredCredential {
    pub fn new(user: User, password_hash: Secret<String>) -> Self {
        Self {
            user,
            password_hash,
        }
    }
}

#[async_trait::async_trait]
impl CredentialRecord for StoredCredential {
    fn user(&self) -> &User {
        &self.user
    }

    async fn verify_password(&self, candidate: &Password) -> bool {
        match verify_password_hash(self.password_hash.clone(), candidate.clone()).await {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(uid = %self.user.id(), error = %e, "Password verification failed");
                false
            }
        }
    }
}

#[derive(Default, Clone)]
pub struct HashMapCredentialStore {
    users: Arc<RwLock<HashMap<Email, StoredCredential>>>,
}

impl HashMapCredentialStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn add_user(&self, user: User, password: Password) -> Result<(), RegistrationError> {
        let password_hash = compute_password_hash(password).await?;

        let mut users = self.users.write().await;
        if users.contains_key(user.email()) {
            return Err(RegistrationError::UserAlreadyExists);
        }
        users.insert(
            user.email().clone(),
            StoredCredential::new(user, password_hash),
        );
        Ok(())
    }
}

#[async_trait::async_trait]
impl CredentialStore for HashMapCredentialStore {
    type Record = StoredCredential;

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Self::Record>, CredentialStoreError> {
        let users = self.users.read().await;
        Ok(users.get(email).cloned())
    }
}
