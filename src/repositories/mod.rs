//! Storage traits and their implementations.
//!
//! - [`users::UserStore`] -- account rows and credential lookup.
//! - [`sessions::SessionStore`] -- refresh-token session rows.
//! - [`postgres::PgStore`] -- the PostgreSQL implementation of both.

pub mod postgres;
pub mod sessions;
pub mod users;

pub use self::sessions::SessionStore;
pub use self::users::UserStore;

use thiserror::Error;

/// A uniqueness constraint violated by an insert, classified by the store.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueViolation {
    /// Another row already holds this username.
    #[error("A user with this username already exists.")]
    Username,
    /// Another row already holds this email address.
    #[error("A user with this email already exists.")]
    Email,
    /// Another session already holds this token.
    #[error("A session with this token already exists.")]
    SessionToken,
}

/// An error produced by a store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// An insert collided with a uniqueness constraint.
    #[error("duplicate value: {0}")]
    Duplicate(UniqueViolation),

    /// The backend could not be reached, or a connection could not be
    /// acquired in time.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// A `Result` type that uses `StoreError` as the error type.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
