use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    services::auth as auth_service,
    state::AppState,
    validation::auth::*,
};

/// The request payload for user registration.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub genre: Option<String>,
}

/// The request payload for user login. The `email` field carries a username
/// or an email address.
#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// The request payload for refresh and logout.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

/// The response payload for registration.
#[derive(Serialize)]
pub struct RegisterResponse {
    pub success: bool,
}

/// The response payload for login.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub is_success: bool,
    pub access_token: String,
    pub refresh_token: String,
}

/// The response payload for a refresh-token exchange.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// The response payload for logout.
#[derive(Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// Reads the User-Agent header, if the client sent one.
fn device_info(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(String::from)
}

/// Handles user registration.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!("📝 Register attempt: {}", payload.username);

    validate_username(&payload.username)?;
    validate_password(&payload.password)?;
    validate_email(&payload.email)?;
    validate_name("First name", &payload.first_name)?;
    validate_name("Last name", &payload.last_name)?;
    validate_optional("Phone", payload.phone.as_deref())?;
    validate_optional("Address", payload.address.as_deref())?;
    validate_optional("Genre", payload.genre.as_deref())?;

    auth_service::register(
        &state,
        auth_service::RegisterInput {
            username: payload.username,
            password: payload.password,
            email: payload.email,
            first_name: payload.first_name,
            last_name: payload.last_name,
            phone: payload.phone,
            address: payload.address,
            genre: payload.genre,
        },
    )
    .await?;

    Ok(Json(RegisterResponse { success: true }))
}

/// Handles user login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let identifier = payload
        .email
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Username or email is required.".to_string()))?;

    let password = payload
        .password
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Password is required.".to_string()))?;

    let pair = auth_service::login(&state, identifier, password, device_info(&headers)).await?;

    Ok(Json(LoginResponse {
        is_success: true,
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

/// Handles a refresh-token exchange.
#[axum::debug_handler]
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse> {
    let presented = payload
        .refresh_token
        .as_deref()
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::BadRequest("Refresh Token is required.".to_string()))?;

    let pair = auth_service::refresh_session(&state, presented, device_info(&headers)).await?;

    Ok(Json(RefreshResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

/// Handles user logout.
#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse> {
    let presented = payload
        .refresh_token
        .as_deref()
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::BadRequest("Refresh Token is required.".to_string()))?;

    auth_service::logout(&state, presented).await?;

    Ok(Json(LogoutResponse {
        message: "Logged out successfully.".to_string(),
    }))
}
