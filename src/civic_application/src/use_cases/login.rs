use civic_core::{
    CredentialRecord, CredentialStore, CredentialStoreError, Email, LoginObserver, Password, Udo,
};
use secrecy::Secret;

/// What a user sees for any credential mismatch, whichever half was wrong.
pub const GENERIC_CREDENTIALS_MESSAGE: &str = "Email / Password combination is wrong.";

/// Internal reason code of an authentication failure. Logged, never shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    Email,
    Password,
    Session,
    Socket,
}

/// User-facing authentication failure with a precise internal kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthenticationError {
    kind: AuthErrorKind,
    message: &'static str,
}

impl AuthenticationError {
    pub fn email_not_found() -> Self {
        Self {
            kind: AuthErrorKind::Email,
            message: GENERIC_CREDENTIALS_MESSAGE,
        }
    }

    pub fn bad_password() -> Self {
        Self {
            kind: AuthErrorKind::Password,
            message: GENERIC_CREDENTIALS_MESSAGE,
        }
    }

    pub fn session() -> Self {
        Self {
            kind: AuthErrorKind::Session,
            message: "You are not authenticated",
        }
    }

    pub fn socket() -> Self {
        Self {
            kind: AuthErrorKind::Socket,
            message: "Not Allowed",
        }
    }

    pub fn kind(&self) -> AuthErrorKind {
        self.kind
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

/// Result of a single login attempt.
#[derive(Debug, PartialEq)]
pub enum AuthenticationOutcome {
    Success(Udo),
    Rejected(AuthenticationError),
    /// The credential store could not answer. Not a credentials problem.
    TransportError(CredentialStoreError),
}

/// Email/password authentication against a credential store.
///
/// One instance per role, built at startup and shared by reference.
pub struct LocalAuthenticator<C, O> {
    credential_store: C,
    observer: O,
}

impl<C, O> LocalAuthenticator<C, O>
where
    C: CredentialStore,
    O: LoginObserver,
{
    pub fn new(credential_store: C, observer: O) -> Self {
        Self {
            credential_store,
            observer,
        }
    }

    /// One lookup, one verification, no retries.
    ///
    /// # Returns
    /// `Success` with the user's UDO, `Rejected` for unknown email or wrong
    /// password (same user-facing message), `TransportError` when the store
    /// lookup itself failed.
    #[tracing::instrument(name = "LocalAuthenticator::authenticate", skip(self, password))]
    pub async fn authenticate(&self, email: &Email, password: &Password) -> AuthenticationOutcome {
        let record = match self.credential_store.find_by_email(email).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::debug!("User not found");
                return AuthenticationOutcome::Rejected(AuthenticationError::email_not_found());
            }
            Err(e) => {
                tracing::warn!(error = %e, "Credential store query failed");
                return AuthenticationOutcome::TransportError(e);
            }
        };

        if !record.verify_password(password).await {
            tracing::debug!("Wrong password");
            return AuthenticationOutcome::Rejected(AuthenticationError::bad_password());
        }

        let udo = Udo::from(record.user());
        tracing::info!(uid = %udo.id, "User logged in");
        self.observer.on_login(&udo);

        AuthenticationOutcome::Success(udo)
    }

    /// Same as [`authenticate`](Self::authenticate) for raw form input.
    ///
    /// Input that cannot be an account (malformed email, empty password) is
    /// rejected with the generic message without touching the store.
    pub async fn authenticate_form(
        &self,
        email: &str,
        password: Secret<String>,
    ) -> AuthenticationOutcome {
        let Ok(email) = Email::parse(email) else {
            return AuthenticationOutcome::Rejected(AuthenticationError::email_not_found());
        };
        let Ok(password) = Password::try_from(password) else {
            return AuthenticationOutcome::Rejected(AuthenticationError::bad_password());
        };

        self.authenticate(&email, &password).await
    }
}
