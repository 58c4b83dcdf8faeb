use chrono::{DateTime, Utc};
use color_eyre::eyre::{eyre, Context, Result};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    domain::{
        data_stores::{CredentialStore, CredentialStoreError, PasswordDigest, UserId},
        email::Email,
        parse::Parseable,
        remember_token::RememberToken,
        user::UserRecord,
    },
    get_postgres_pool,
    utils::constants::DATABASE_URL,
};

/// Connect to `DATABASE_URL` and bring the schema up to date.
pub async fn configure_postgresql() -> Result<PgPool> {
    let pg_pool = get_postgres_pool(&DATABASE_URL)
        .await
        .wrap_err("Failed to create Postgres connection pool")?;
    tracing::info!("created Postgres connection pool");

    sqlx::migrate!()
        .run(&pg_pool)
        .await
        .wrap_err("Failed to run migrations")?;

    Ok(pg_pool)
}

type UserRow = (Uuid, String, String, String, String, DateTime<Utc>, DateTime<Utc>);

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CredentialStore for PostgresCredentialStore {
    #[tracing::instrument(name = "Insert user record into PostgreSQL", skip_all)]
    async fn insert(&mut self, record: UserRecord) -> Result<UserId, CredentialStoreError> {
        let id = UserId::default();
        sqlx::query(
            r#"
            INSERT INTO users
            (id, name, email, password_digest, remember_token, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id.as_uuid())
        .bind(&record.name)
        .bind(record.email.as_ref())
        .bind(record.password_digest.as_ref())
        .bind(record.remember_token.as_ref().expose_secret())
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(id)
    }

    #[tracing::instrument(name = "Update user record in PostgreSQL", skip_all, fields(%id))]
    async fn update(
        &mut self,
        id: &UserId,
        record: UserRecord,
    ) -> Result<(), CredentialStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3, password_digest = $4, remember_token = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(&record.name)
        .bind(record.email.as_ref())
        .bind(record.password_digest.as_ref())
        .bind(record.remember_token.as_ref().expose_secret())
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(CredentialStoreError::NotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Find user record by email in PostgreSQL", skip_all)]
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<(UserId, UserRecord), CredentialStoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, password_digest, remember_token, created_at, updated_at
            FROM users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email.as_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CredentialStoreError::UnexpectedError(e.into()))?;

        row.ok_or(CredentialStoreError::NotFound)
            .and_then(into_record)
    }

    #[tracing::instrument(name = "Find user record by id in PostgreSQL", skip_all, fields(%id))]
    async fn find_by_id(&self, id: &UserId) -> Result<(UserId, UserRecord), CredentialStoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, password_digest, remember_token, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CredentialStoreError::UnexpectedError(e.into()))?;

        row.ok_or(CredentialStoreError::NotFound)
            .and_then(into_record)
    }

    #[tracing::instrument(name = "Delete user record from PostgreSQL", skip_all, fields(%id))]
    async fn delete(&mut self, id: &UserId) -> Result<(), CredentialStoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| CredentialStoreError::UnexpectedError(e.into()))?;

        if result.rows_affected() == 0 {
            return Err(CredentialStoreError::NotFound);
        }
        Ok(())
    }
}

fn map_write_error(err: sqlx::Error) -> CredentialStoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return CredentialStoreError::UniqueConstraint;
        }
    }
    CredentialStoreError::UnexpectedError(err.into())
}

fn into_record(row: UserRow) -> Result<(UserId, UserRecord), CredentialStoreError> {
    let (id, name, email, password_digest, remember_token, created_at, updated_at) = row;
    let record = UserRecord {
        name,
        email: Email::parse(email)
            .map_err(|e| CredentialStoreError::UnexpectedError(eyre!(e)))?,
        password_digest: PasswordDigest::new(password_digest),
        remember_token: RememberToken::parse(remember_token)
            .map_err(|e| CredentialStoreError::UnexpectedError(eyre!(e)))?,
        created_at,
        updated_at,
    };
    Ok((UserId::from(id), record))
}
