//! The caller's own profile and characters.

use axum::extract::State;
use axum::Json;
use taverna_core::error::CoreError;
use taverna_db::models::character::CharacterWithFriendships;
use taverna_db::models::user::UserResponse;
use taverna_db::repositories::{CharacterRepo, RoleRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let row = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;
    let role = RoleRepo::resolve_name(&state.pool, row.role_id).await?;
    Ok(Json(UserResponse {
        id: row.id,
        username: row.username,
        email: row.email,
        role,
        created_at: row.created_at,
    }))
}

/// GET /api/v1/users/me/characters
///
/// The caller's characters, newest first, with friendships embedded.
pub async fn my_characters(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<CharacterWithFriendships>>> {
    let characters = CharacterRepo::list_by_user(&state.pool, user.user_id).await?;
    Ok(Json(characters))
}
