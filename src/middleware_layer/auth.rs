use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};

use crate::{
    crypto::token::{self, TokenError},
    error::AppError,
    state::AppState,
};

/// The authenticated caller, injected into request extensions by
/// [`require_auth`].
#[derive(Clone, Debug)]
pub struct CurrentUser {
    /// The user's database id, from the token's `sub` claim.
    pub id: i32,
    /// The user's email address.
    pub email: String,
}

/// Extracts the bearer token from the Authorization header.
///
/// # Arguments
///
/// * `request` - The incoming request.
///
/// # Returns
///
/// An `Option` containing the token if found.
fn extract_bearer(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// The uniform 401 answered for every rejection class.
fn unauthorized() -> AppError {
    AppError::Authentication("Invalid or expired token.".to_string())
}

/// A middleware that requires a valid access token to be present.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// A `Response`, or the uniform 401 if the token is missing or unusable.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    tracing::debug!("🔐 Checking authentication...");

    let bearer = extract_bearer(&request).ok_or_else(|| {
        tracing::warn!("❌ No bearer token on request");
        unauthorized()
    })?;

    let claims = token::verify(bearer, &state.config).map_err(|err| {
        match err {
            TokenError::Expired => tracing::warn!("❌ Access token expired"),
            TokenError::InvalidSignature => {
                tracing::warn!("❌ Access token signature mismatch")
            }
            TokenError::Malformed => tracing::warn!("❌ Malformed access token"),
        }
        unauthorized()
    })?;

    tracing::debug!("✅ User authenticated: {}", claims.sub);

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(request).await)
}
