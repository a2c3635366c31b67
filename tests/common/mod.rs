use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, header};
use axum::response::Response;
use chrono::{DateTime, Duration, Utc};
use http_body_util::BodyExt;
use tokio::sync::RwLock;
use tower::ServiceExt;
use zeroize::Zeroizing;

use picboard::config::Config;
use picboard::crypto::password::digests_match;
use picboard::models::session::Session;
use picboard::models::user::{NewUser, User};
use picboard::repositories::{
    SessionStore, StoreError, StoreResult, UniqueViolation, UserStore,
};
use picboard::routes;
use picboard::state::AppState;

/// An in-memory implementation of both stores, mirroring the uniqueness and
/// conditional-revoke contracts of the PostgreSQL adapter.
pub struct MemoryStore {
    users: RwLock<HashMap<i32, User>>,
    sessions: RwLock<HashMap<String, Session>>,
    next_user_id: AtomicI32,
    blind_prechecks: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            next_user_id: AtomicI32::new(1),
            blind_prechecks: AtomicBool::new(false),
        }
    }

    /// Makes `email_exists` and `username_exists` report nothing, so an
    /// insert runs into the uniqueness checks the way it does when a
    /// concurrent registration wins the window between pre-check and insert.
    pub fn disable_prechecks(&self) {
        self.blind_prechecks.store(true, Ordering::SeqCst);
    }

    /// Flips a user's `active` flag off, as an operator soft-delete would.
    pub async fn deactivate_user(&self, id: i32) {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.active = false;
        }
    }

    /// Moves a session's expiry into the past.
    pub async fn expire_session(&self, token: &str) {
        if let Some(session) = self.sessions.write().await.get_mut(token) {
            session.expiry_date = Utc::now() - Duration::seconds(1);
        }
    }

    /// Drops a user row entirely.
    pub async fn remove_user(&self, id: i32) {
        self.users.write().await.remove(&id);
    }

    /// The number of session rows held, live or not.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(UniqueViolation::Email));
        }
        if users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate(UniqueViolation::Username));
        }

        let id = self.next_user_id.fetch_add(1, Ordering::SeqCst);
        let stored = User {
            id,
            username: user.username,
            password: user.password,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            date_birth: user.date_birth,
            active: user.active,
            phone: user.phone,
            address: user.address,
            genre: user.genre,
            avatar: user.avatar,
            created_by: user.created_by,
            created_at: user.created_at,
            updated_at: user.updated_at,
        };
        users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        if self.blind_prechecks.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(self.users.read().await.values().any(|u| u.email == email))
    }

    async fn username_exists(&self, username: &str) -> StoreResult<bool> {
        if self.blind_prechecks.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|u| u.username == username))
    }

    async fn find_by_credentials(
        &self,
        identifier: &str,
        password_digest: &str,
    ) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| {
                (u.email == identifier || u.username == identifier)
                    && digests_match(&u.password, password_digest)
            })
            .cloned())
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert(&self, session: &Session) -> StoreResult<()> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.token) {
            return Err(StoreError::Duplicate(UniqueViolation::SessionToken));
        }
        sessions.insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> StoreResult<Option<Session>> {
        Ok(self.sessions.read().await.get(token).cloned())
    }

    async fn revoke(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
        replaced_by: Option<&str>,
    ) -> StoreResult<bool> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(token) {
            Some(session) if session.revoked_at.is_none() => {
                session.revoked_at = Some(revoked_at);
                session.replaced_by_token = replaced_by.map(String::from);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Build a test `Config` with a known signing secret.
pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        jwt_secret: Zeroizing::new("integration-test-secret-0123456789".to_string()),
        access_token_ttl_minutes: 10,
        refresh_token_ttl_days: 7,
        listen_addr: "127.0.0.1:0".to_string(),
    }
}

/// Build the application router over the given in-memory store.
///
/// This mirrors the router construction in `main.rs` minus the
/// environmental layers (rate limiter, CORS, static files), so tests
/// exercise the same routes and middleware that production uses.
pub fn build_test_app(store: Arc<MemoryStore>) -> Router {
    let state = AppState::new(test_config(), store.clone(), store);
    routes::api_router(state)
}

/// Send a GET request to the app.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with a bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and a User-Agent header.
pub async fn post_json_ua(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    user_agent: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::USER_AGENT, user_agent)
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
