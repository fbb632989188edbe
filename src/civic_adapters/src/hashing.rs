//! Argon2id password hashing, run off the async executor.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher, SaltString, rand_core},
};
use civic_core::Password;
use secrecy::{ExposeSecret, Secret};

#[derive(Debug, thiserror::Error)]
pub enum HashingError {
    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),
    #[error("Password hashing failed: {0}")]
    Hashing(String),
    #[error("Hashing task failed: {0}")]
    Task(String),
}

fn hasher() -> Result<Argon2<'static>, HashingError> {
    let params =
        Params::new(15000, 2, 1, None).map_err(|e| HashingError::Hashing(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// `Ok(true)` on match, `Ok(false)` on mismatch. A hash that cannot be
/// parsed is an error, not a mismatch.
#[tracing::instrument(name = "Verify password hash", skip_all)]
pub async fn verify_password_hash(
    expected_password_hash: Secret<String>,
    password_candidate: Password,
) -> Result<bool, HashingError> {
    let current_span: tracing::Span = tracing::Span::current();
    tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| {
            let expected_password_hash = PasswordHash::new(expected_password_hash.expose_secret())
                .map_err(|e| HashingError::MalformedHash(e.to_string()))?;

            match hasher()?.verify_password(
                password_candidate.as_ref().expose_secret().as_bytes(),
                &expected_password_hash,
            ) {
                Ok(()) => Ok(true),
                Err(argon2::password_hash::Error::Password) => Ok(false),
                Err(e) => Err(HashingError::Hashing(e.to_string())),
            }
        })
    })
    .await
    .map_err(|e| HashingError::Task(e.to_string()))?
}

#[tracing::instrument(name = "Computing password hash", skip_all)]
pub async fn compute_password_hash(password: Password) -> Result<Secret<String>, HashingError> {
    let current_span: tracing::Span = tracing::Span::current();
    tokio::task::spawn_blocking(move || {
        current_span.in_scope(move || {
            let salt = SaltString::generate(rand_core::OsRng);
            hasher()?
                .hash_password(password.as_ref().expose_secret().as_bytes(), &salt)
                .map(|h| Secret::from(h.to_string()))
                .map_err(|e| HashingError::Hashing(e.to_string()))
        })
    })
    .await
    .map_err(|e| HashingError::Task(e.to_string()))?
}
