use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Represents a refresh-token session.
///
/// A session is live until it is revoked or its expiry passes. Revocation is
/// set-once: `revoked_at` is never cleared, and rotated sessions keep their
/// row with `replaced_by_token` pointing at the successor.
#[derive(Debug, Clone)]
pub struct Session {
    /// The unique identifier for the session.
    pub id: Uuid,
    /// The ID of the user this session belongs to.
    pub user_id: i32,
    /// The opaque refresh token presented by the client.
    pub token: String,
    /// The timestamp when the session expires.
    pub expiry_date: DateTime<Utc>,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the session was revoked, if it has been.
    pub revoked_at: Option<DateTime<Utc>>,
    /// The token that replaced this one during rotation, if any.
    pub replaced_by_token: Option<String>,
    /// The User-Agent captured when the session was issued.
    pub device_info: Option<String>,
}

impl Session {
    /// Creates a new live session for `user_id` carrying `token`, expiring
    /// `ttl_days` from now.
    pub fn new(user_id: i32, token: String, ttl_days: i64, device_info: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            token,
            expiry_date: now + Duration::days(ttl_days),
            created_at: now,
            revoked_at: None,
            replaced_by_token: None,
            device_info,
        }
    }

    /// Whether the session has been revoked.
    #[inline]
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Whether the session has expired as of `now`. A session whose expiry
    /// equals `now` exactly is already expired.
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date <= now
    }

    /// Whether the session is live as of `now` (not revoked and not expired).
    #[inline]
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked() && !self.is_expired(now)
    }
}
