use chrono::Utc;

use crate::{
    crypto::{password, refresh, token},
    error::{AppError, Result},
    models::{
        session::Session,
        user::{DEFAULT_AVATAR, NewUser, User},
    },
    repositories::StoreError,
    state::AppState,
};

/// The fields collected by the register handler, already validated.
#[derive(Debug)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub genre: Option<String>,
}

/// An access token and the refresh token that can renew it.
#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Registers a new user account.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `input` - The validated registration fields.
///
/// # Returns
///
/// A `Result` containing the created `User`.
pub async fn register(state: &AppState, input: RegisterInput) -> Result<User> {
    tracing::debug!("🔐 Registering user: {}", input.username);

    if state.users.email_exists(&input.email).await? {
        return Err(AppError::Conflict(
            "A user with this email already exists.".to_string(),
        ));
    }

    if state.users.username_exists(&input.username).await? {
        return Err(AppError::Conflict(
            "A user with this username already exists.".to_string(),
        ));
    }

    let now = Utc::now();
    let created_by = format!("{} {}", input.first_name, input.last_name);

    let new_user = NewUser {
        username: input.username,
        password: password::digest(&input.password),
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        date_birth: None,
        active: true,
        phone: input.phone,
        address: input.address,
        genre: input.genre,
        avatar: DEFAULT_AVATAR.to_string(),
        created_by: Some(created_by),
        created_at: now,
        updated_at: now,
    };

    let user = match state.users.insert(new_user).await {
        Ok(user) => user,
        // The pre-checks race with concurrent registrations; the store's
        // uniqueness constraint is the authority.
        Err(StoreError::Duplicate(violation)) => {
            return Err(AppError::Conflict(violation.to_string()));
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("✅ User registered with ID: {}", user.id);
    Ok(user)
}

/// Authenticates a user and opens a new session.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `identifier` - The username or email the user signed in with.
/// * `password` - The password as entered.
/// * `device_info` - The User-Agent of the signing-in client, if any.
///
/// # Returns
///
/// A `Result` containing the issued `TokenPair`.
pub async fn login(
    state: &AppState,
    identifier: &str,
    password: &str,
    device_info: Option<String>,
) -> Result<TokenPair> {
    let identifier = identifier.trim();
    tracing::debug!("🔐 Authenticating: {}", identifier);

    let digest = password::digest(password);
    let user = state
        .users
        .find_by_credentials(identifier, &digest)
        .await?
        .ok_or_else(|| AppError::Authentication("Invalid credentials.".to_string()))?;

    if !user.active {
        return Err(AppError::Forbidden("This account is inactive.".to_string()));
    }

    let access_token = token::issue(user.id, &user.email, &state.config)
        .map_err(|e| AppError::Internal(format!("Failed to sign access token: {}", e)))?;
    let refresh_token = refresh::generate();

    let session = Session::new(
        user.id,
        refresh_token.clone(),
        state.config.refresh_token_ttl_days,
        device_info,
    );
    state.sessions.insert(&session).await?;

    tracing::info!("✅ User authenticated: {}", user.id);

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Redeems a refresh token for a new token pair, rotating the session.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `presented` - The refresh token presented by the client.
/// * `device_info` - The User-Agent of the presenting client, if any.
///
/// # Returns
///
/// A `Result` containing the successor `TokenPair`.
pub async fn refresh_session(
    state: &AppState,
    presented: &str,
    device_info: Option<String>,
) -> Result<TokenPair> {
    let now = Utc::now();

    let session = state
        .sessions
        .find_by_token(presented)
        .await?
        .ok_or_else(|| {
            AppError::Authentication("Invalid or expired Refresh Token.".to_string())
        })?;

    if !session.is_valid(now) {
        tracing::warn!("Rejected refresh of session {}: expired or revoked", session.id);
        return Err(AppError::Authentication(
            "Invalid or expired Refresh Token.".to_string(),
        ));
    }

    let user = state
        .users
        .find_by_id(session.user_id)
        .await?
        .filter(|user| user.active)
        .ok_or_else(|| {
            AppError::Authentication("Invalid user associated with Refresh Token.".to_string())
        })?;

    let successor = refresh::generate();

    // The conditional revoke is the test-and-set that keeps a refresh token
    // single-use: losing the race means someone else already redeemed it.
    let revoked = state
        .sessions
        .revoke(presented, now, Some(&successor))
        .await?;
    if !revoked {
        tracing::warn!("Refresh token of user {} was already redeemed", user.id);
        return Err(AppError::Authentication(
            "Invalid or expired Refresh Token.".to_string(),
        ));
    }

    let session = Session::new(
        user.id,
        successor.clone(),
        state.config.refresh_token_ttl_days,
        device_info,
    );
    state.sessions.insert(&session).await?;

    let access_token = token::issue(user.id, &user.email, &state.config)
        .map_err(|e| AppError::Internal(format!("Failed to sign access token: {}", e)))?;

    tracing::info!("🔄 Session rotated for user: {}", user.id);

    Ok(TokenPair {
        access_token,
        refresh_token: successor,
    })
}

/// Revokes the session holding the presented refresh token.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `presented` - The refresh token presented by the client.
///
/// # Returns
///
/// A `Result<()>`; an unknown or already revoked token fails with a 400.
pub async fn logout(state: &AppState, presented: &str) -> Result<()> {
    let revoked = state.sessions.revoke(presented, Utc::now(), None).await?;
    if !revoked {
        return Err(AppError::BadRequest(
            "Invalid or already logged out Refresh Token.".to_string(),
        ));
    }

    tracing::info!("👋 Session revoked");
    Ok(())
}
