use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::{Pool, PoolError};
use std::time::Duration;
use tokio_postgres::{Row, error::SqlState};

use crate::{
    models::{
        session::Session,
        user::{NewUser, User},
    },
    repositories::{SessionStore, StoreError, StoreResult, UniqueViolation, UserStore},
};

/// Attempts made to acquire a pooled connection before giving up.
const ACQUIRE_ATTEMPTS: u32 = 3;
/// Backoff before the second acquisition attempt; doubles per attempt.
const ACQUIRE_BACKOFF: Duration = Duration::from_millis(50);

/// The PostgreSQL implementation of [`UserStore`] and [`SessionStore`],
/// sharing one connection pool.
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    /// Creates a new store over `pool`.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Applies the schema migration. Safe to run on every startup.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        let client = self.client().await?;
        client
            .batch_execute(include_str!("../../migrations/0001_init.sql"))
            .await?;
        Ok(())
    }

    /// Acquires a pooled connection, retrying transient failures with
    /// exponential backoff.
    async fn client(&self) -> StoreResult<deadpool_postgres::Object> {
        let mut backoff = ACQUIRE_BACKOFF;
        let mut attempt = 1;
        loop {
            match self.pool.get().await {
                Ok(client) => return Ok(client),
                Err(err) if attempt < ACQUIRE_ATTEMPTS && is_transient(&err) => {
                    tracing::warn!(
                        "Connection acquisition failed (attempt {}/{}): {}",
                        attempt,
                        ACQUIRE_ATTEMPTS,
                        err
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    attempt += 1;
                }
                Err(err) => return Err(StoreError::Unavailable(err.to_string())),
            }
        }
    }
}

/// Whether a pool error is worth retrying.
fn is_transient(err: &PoolError) -> bool {
    matches!(err, PoolError::Timeout(_) | PoolError::Backend(_))
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            if db_err.code() == &SqlState::UNIQUE_VIOLATION {
                return match db_err.constraint() {
                    Some("uq_users_username") => StoreError::Duplicate(UniqueViolation::Username),
                    Some("uq_users_email") => StoreError::Duplicate(UniqueViolation::Email),
                    Some("uq_refresh_tokens_token") => {
                        StoreError::Duplicate(UniqueViolation::SessionToken)
                    }
                    _ => StoreError::Backend(err.to_string()),
                };
            }
        }
        StoreError::Backend(err.to_string())
    }
}

/// A helper function to map a `tokio_postgres::Row` to a `User`.
fn row_to_user(row: &Row) -> StoreResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password: row.try_get("password")?,
        email: row.try_get("email")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        date_birth: row.try_get("date_birth")?,
        active: row.try_get("active")?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        genre: row.try_get("genre")?,
        avatar: row.try_get("avatar")?,
        created_by: row.try_get("created_by")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// A helper function to map a `tokio_postgres::Row` to a `Session`.
fn row_to_session(row: &Row) -> StoreResult<Session> {
    Ok(Session {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        token: row.try_get("token")?,
        expiry_date: row.try_get("expiry_date")?,
        created_at: row.try_get("created_at")?,
        revoked_at: row.try_get("revoked_at")?,
        replaced_by_token: row.try_get("replaced_by_token")?,
        device_info: row.try_get("device_info")?,
    })
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        let client = self.client().await?;
        let row = client
            .query_one(
                r#"
                INSERT INTO users (
                    username, password, email, first_name, last_name, date_birth,
                    active, phone, address, genre, avatar, created_by,
                    created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                RETURNING *
                "#,
                &[
                    &user.username,
                    &user.password,
                    &user.email,
                    &user.first_name,
                    &user.last_name,
                    &user.date_birth,
                    &user.active,
                    &user.phone,
                    &user.address,
                    &user.genre,
                    &user.avatar,
                    &user.created_by,
                    &user.created_at,
                    &user.updated_at,
                ],
            )
            .await?;
        row_to_user(&row)
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        let client = self.client().await?;
        let row = client
            .query_one(
                r#"
                SELECT EXISTS(SELECT 1 FROM users WHERE email = $1) AS present
                "#,
                &[&email],
            )
            .await?;
        Ok(row.try_get("present")?)
    }

    async fn username_exists(&self, username: &str) -> StoreResult<bool> {
        let client = self.client().await?;
        let row = client
            .query_one(
                r#"
                SELECT EXISTS(SELECT 1 FROM users WHERE username = $1) AS present
                "#,
                &[&username],
            )
            .await?;
        Ok(row.try_get("present")?)
    }

    async fn find_by_credentials(
        &self,
        identifier: &str,
        password_digest: &str,
    ) -> StoreResult<Option<User>> {
        let client = self.client().await?;
        let row = client
            .query_opt(
                r#"
                SELECT *
                FROM users
                WHERE (email = $1 OR username = $1) AND password = $2
                LIMIT 1
                "#,
                &[&identifier, &password_digest],
            )
            .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<User>> {
        let client = self.client().await?;
        let row = client
            .query_opt(
                r#"
                SELECT *
                FROM users
                WHERE id = $1
                "#,
                &[&id],
            )
            .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn insert(&self, session: &Session) -> StoreResult<()> {
        let client = self.client().await?;
        client
            .execute(
                r#"
                INSERT INTO refresh_tokens (
                    id, user_id, token, expiry_date, created_at,
                    revoked_at, replaced_by_token, device_info
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
                &[
                    &session.id,
                    &session.user_id,
                    &session.token,
                    &session.expiry_date,
                    &session.created_at,
                    &session.revoked_at,
                    &session.replaced_by_token,
                    &session.device_info,
                ],
            )
            .await?;
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> StoreResult<Option<Session>> {
        let client = self.client().await?;
        let row = client
            .query_opt(
                r#"
                SELECT *
                FROM refresh_tokens
                WHERE token = $1
                "#,
                &[&token],
            )
            .await?;
        row.map(|r| row_to_session(&r)).transpose()
    }

    async fn revoke(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
        replaced_by: Option<&str>,
    ) -> StoreResult<bool> {
        let client = self.client().await?;
        let rows = client
            .execute(
                r#"
                UPDATE refresh_tokens
                SET revoked_at = $2, replaced_by_token = $3
                WHERE token = $1 AND revoked_at IS NULL
                "#,
                &[&token, &revoked_at, &replaced_by],
            )
            .await?;
        Ok(rows == 1)
    }
}
