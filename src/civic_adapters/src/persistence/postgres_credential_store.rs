use civic_core::{CredentialStore, CredentialStoreError, Email, Password, User, UserId};
use secrecy::{ExposeSecret, Secret};
use sqlx::{FromRow, Pool, Postgres};
use uuid::Uuid;

use super::hashmap_credential_store::{RegistrationError, StoredCredential};
use crate::hashing::compute_password_hash;

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    password_hash: String,
}

impl TryFrom<UserRow> for StoredCredential {
    type Error = CredentialStoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email)
            .map_err(|e| CredentialStoreError::CorruptRecord(format!("{}: {e}", row.id)))?;
        let user = User::new(
            UserId::from(row.id),
            email,
            row.first_name,
            row.last_name,
        );
        Ok(StoredCredential::new(user, Secret::from(row.password_hash)))
    }
}

#[derive(Clone)]
pub struct PostgresCredentialStore {
    pool: sqlx::PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresCredentialStore { pool }
    }

    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    pub async fn add_user(&self, user: &User, password: Password) -> Result<(), RegistrationError> {
        let password_hash = compute_password_hash(password).await?;

        sqlx::query(
            r#"
                INSERT INTO users (id, email, first_name, last_name, password_hash)
                VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(*user.id().as_uuid())
        .bind(user.email().as_ref().expose_secret())
        .bind(user.first_name())
        .bind(user.last_name())
        .bind(password_hash.expose_secret())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.constraint().is_some() {
                    return RegistrationError::UserAlreadyExists;
                }
            }
            RegistrationError::UnexpectedError(e.to_string())
        })?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl CredentialStore for PostgresCredentialStore {
    type Record = StoredCredential;

    #[tracing::instrument(name = "Retrieving credentials from PostgreSQL", skip_all)]
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Self::Record>, CredentialStoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT id, email, first_name, last_name, password_hash
                FROM users
                WHERE email = $1
            "#,
        )
        .bind(email.as_ref().expose_secret())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CredentialStoreError::Unavailable(e.to_string()))?;

        row.map(StoredCredential::try_from).transpose()
    }
}
