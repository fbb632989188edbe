use civic_core::{SessionStore, SessionStoreError, SessionToken};

/// Error types for logout use case
#[derive(Debug, thiserror::Error)]
pub enum LogoutError {
    #[error("Session store error: {0}")]
    SessionStoreError(#[from] SessionStoreError),
}

/// Logout use case - invalidates a session record
pub struct LogoutUseCase<S>
where
    S: SessionStore,
{
    session_store: S,
}

impl<S> LogoutUseCase<S>
where
    S: SessionStore,
{
    pub fn new(session_store: S) -> Self {
        Self { session_store }
    }

    /// Destroys the record behind `token`. Unknown tokens are not an error.
    #[tracing::instrument(name = "LogoutUseCase::execute", skip(self))]
    pub async fn execute(&self, token: &SessionToken) -> Result<(), LogoutError> {
        self.session_store.destroy(token).await?;
        Ok(())
    }
}
