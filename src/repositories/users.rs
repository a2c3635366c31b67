use async_trait::async_trait;

use crate::{
    models::user::{NewUser, User},
    repositories::StoreResult,
};

/// Storage operations for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new user and returns the stored row with its assigned id.
    async fn insert(&self, user: NewUser) -> StoreResult<User>;

    /// Whether any user holds this email address.
    async fn email_exists(&self, email: &str) -> StoreResult<bool>;

    /// Whether any user holds this username.
    async fn username_exists(&self, username: &str) -> StoreResult<bool>;

    /// Finds the single user whose email or username equals `identifier` and
    /// whose stored digest equals `password_digest`. Matches active and
    /// inactive accounts alike.
    async fn find_by_credentials(
        &self,
        identifier: &str,
        password_digest: &str,
    ) -> StoreResult<Option<User>>;

    /// Finds a user by their ID.
    async fn find_by_id(&self, id: i32) -> StoreResult<Option<User>>;
}
