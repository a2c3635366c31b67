use axum::{Extension, Json, extract::State, response::IntoResponse};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::{
    error::{AppError, Result},
    middleware_layer::auth::CurrentUser,
    models::user::User,
    state::AppState,
};

/// The password-free projection of a user, safe to send to clients.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i32,
    pub username: String,
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

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
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
        }
    }
}

/// The response payload for the profile endpoint.
#[derive(Serialize)]
pub struct MeResponse {
    pub data: PublicUser,
}

/// Returns the profile of the authenticated user.
#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let user = state
        .users
        .find_by_id(current.id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(MeResponse {
        data: PublicUser::from(user),
    }))
}
