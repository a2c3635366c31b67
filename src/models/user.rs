use chrono::{DateTime, NaiveDate, Utc};

/// Avatar assigned to every account at registration.
pub const DEFAULT_AVATAR: &str = "/avatars/blank.svg";

/// Represents a user in the system.
#[derive(Clone, Debug)]
pub struct User {
    /// The unique identifier for the user.
    pub id: i32,
    /// The user's username.
    pub username: String,
    /// The hex digest of the user's password.
    pub password: String,
    /// The user's email address.
    pub email: String,
    /// The user's first name.
    pub first_name: String,
    /// The user's last name.
    pub last_name: String,
    /// The user's date of birth.
    pub date_birth: Option<NaiveDate>,
    /// Whether the account is active. Inactive accounts cannot sign in.
    pub active: bool,
    /// The user's phone number.
    pub phone: Option<String>,
    /// The user's address.
    pub address: Option<String>,
    /// The user's genre.
    pub genre: Option<String>,
    /// Path to the user's avatar image.
    pub avatar: String,
    /// Audit string recording who created the account.
    pub created_by: Option<String>,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The insert shape for a new user row. The id is assigned by the store.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_birth: Option<NaiveDate>,
    pub active: bool,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub genre: Option<String>,
    pub avatar: String,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
