//! Admin-only endpoints. All handlers here take the `RequireAdmin`
//! extractor, so a non-admin token is rejected before the handler body
//! runs.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use taverna_core::error::CoreError;
use taverna_core::types::DbId;
use taverna_db::models::character::{CharacterWithOwner, RpgSystemCount};
use taverna_db::repositories::{CharacterRepo, UserRepo, VoteRepo};
use taverna_events::GalleryEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Gallery-wide counters for the admin dashboard.
#[derive(Debug, Serialize)]
pub struct GalleryStats {
    pub total_users: i64,
    pub total_characters: i64,
    pub total_votes: i64,
    pub characters_by_system: Vec<RpgSystemCount>,
}

/// GET /api/v1/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> AppResult<Json<GalleryStats>> {
    let total_users = UserRepo::count(&state.pool).await?;
    let total_characters = CharacterRepo::count(&state.pool).await?;
    let total_votes = VoteRepo::count(&state.pool).await?;
    let characters_by_system = CharacterRepo::count_by_system(&state.pool).await?;

    Ok(Json(GalleryStats {
        total_users,
        total_characters,
        total_votes,
        characters_by_system,
    }))
}

/// GET /api/v1/admin/characters
///
/// Moderation listing: every character with its owner's username.
pub async fn list_characters(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> AppResult<Json<Vec<CharacterWithOwner>>> {
    let characters = CharacterRepo::list_with_owner(&state.pool).await?;
    Ok(Json(characters))
}

/// DELETE /api/v1/admin/characters/{id}
///
/// Remove any character regardless of owner. Votes and friendships
/// cascade; subscribers get a deletion event.
pub async fn delete_character(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<StatusCode> {
    let deleted = CharacterRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }));
    }

    state
        .event_bus
        .publish(GalleryEvent::character_deleted(id, admin.user_id));
    Ok(StatusCode::NO_CONTENT)
}
