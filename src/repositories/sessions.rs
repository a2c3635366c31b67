use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{models::session::Session, repositories::StoreResult};

/// Storage operations for refresh-token sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts a new session row.
    async fn insert(&self, session: &Session) -> StoreResult<()>;

    /// Finds a session by its token, revoked or not.
    async fn find_by_token(&self, token: &str) -> StoreResult<Option<Session>>;

    /// Revokes the session holding `token` if and only if it has not been
    /// revoked yet, recording `revoked_at` and, during rotation, the
    /// successor token. Returns whether a row actually transitioned; `false`
    /// means the token was unknown or already revoked.
    async fn revoke(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
        replaced_by: Option<&str>,
    ) -> StoreResult<bool>;
}
