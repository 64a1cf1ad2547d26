//! Handlers for the `/characters` resource.
//!
//! Reads are public; mutations require authentication and pass an
//! owner-or-admin check. Creates and updates carry the friendship list
//! inline, and the repository applies it in the same transaction as the
//! character row.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use taverna_core::character::{AGE_MAX, HEIGHT_MAX, NAME_MAX_LEN};
use taverna_core::error::CoreError;
use taverna_core::types::DbId;
use taverna_db::models::character::{
    Character, CharacterWithFriendships, CreateCharacter, FriendshipEntry, UpdateCharacter,
};
use taverna_db::repositories::CharacterRepo;
use taverna_events::GalleryEvent;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A friendship entry in character create/update input.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FriendshipInput {
    #[validate(length(min = 1, max = 100, message = "friend name must be 1-100 characters"))]
    pub friend_name: String,
    #[validate(range(min = 0, max = 10, message = "friendship level must be between 0 and 10"))]
    pub friendship_level: i32,
}

/// Request body for `POST /characters`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCharacterRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "player name must be 1-100 characters"))]
    pub player_name: String,
    #[validate(range(min = 0, message = "age must be non-negative"))]
    pub age: i32,
    #[validate(range(min = 0.0, message = "height must be non-negative"))]
    pub height: f64,
    #[validate(length(min = 1, max = 100, message = "rpg system must be 1-100 characters"))]
    pub rpg_system: String,
    pub story: String,
    #[serde(default)]
    #[validate(nested)]
    pub friendships: Vec<FriendshipInput>,
}

/// Request body for `PUT /characters/{id}`. Scalar fields are optional;
/// `friendships`, when present, fully replaces the stored list.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCharacterRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "player name must be 1-100 characters"))]
    pub player_name: Option<String>,
    #[validate(range(min = 0, message = "age must be non-negative"))]
    pub age: Option<i32>,
    #[validate(range(min = 0.0, message = "height must be non-negative"))]
    pub height: Option<f64>,
    #[validate(length(min = 1, max = 100, message = "rpg system must be 1-100 characters"))]
    pub rpg_system: Option<String>,
    pub story: Option<String>,
    #[validate(nested)]
    pub friendships: Option<Vec<FriendshipInput>>,
}

/// Query parameters for `GET /characters`.
#[derive(Debug, Deserialize)]
pub struct ListCharactersParams {
    /// Restrict the listing to one game system.
    pub rpg_system: Option<String>,
}

/// One game-system section of the grouped gallery listing.
#[derive(Debug, Serialize)]
pub struct RpgSystemGroup {
    pub rpg_system: String,
    pub characters: Vec<CharacterWithFriendships>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/characters
///
/// Create a character owned by the caller, with its friendship list.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateCharacterRequest>,
) -> AppResult<(StatusCode, Json<CharacterWithFriendships>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    validate_bounds(input.age, input.height)?;

    let create_dto = CreateCharacter {
        user_id: user.user_id,
        name: input.name,
        player_name: input.player_name,
        age: input.age,
        height: input.height,
        rpg_system: input.rpg_system,
        story: input.story,
        image_url: None,
        friendships: to_entries(input.friendships),
    };

    let character = CharacterRepo::create(&state.pool, &create_dto).await?;
    state.event_bus.publish(GalleryEvent::character_changed(
        character.character.id,
        user.user_id,
    ));
    Ok((StatusCode::CREATED, Json(character)))
}

/// GET /api/v1/characters
///
/// Newest-first listing with friendships embedded; `?rpg_system=` filters.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListCharactersParams>,
) -> AppResult<Json<Vec<CharacterWithFriendships>>> {
    let characters = CharacterRepo::list(&state.pool, params.rpg_system.as_deref()).await?;
    Ok(Json(characters))
}

/// GET /api/v1/characters/grouped
///
/// The gallery view: characters bucketed by game system. Groups are
/// sorted by system name; within a group, newest first.
pub async fn list_grouped(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RpgSystemGroup>>> {
    let characters = CharacterRepo::list(&state.pool, None).await?;

    let mut groups: Vec<RpgSystemGroup> = Vec::new();
    for character in characters {
        let system = character.character.rpg_system.clone();
        match groups.iter_mut().find(|g| g.rpg_system == system) {
            Some(group) => group.characters.push(character),
            None => groups.push(RpgSystemGroup {
                rpg_system: system,
                characters: vec![character],
            }),
        }
    }
    groups.sort_by(|a, b| a.rpg_system.cmp(&b.rpg_system));
    Ok(Json(groups))
}

/// GET /api/v1/characters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<CharacterWithFriendships>> {
    let character = CharacterRepo::find_with_friendships(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))?;
    Ok(Json(character))
}

/// PUT /api/v1/characters/{id}
///
/// Owner or admin only. Applies scalar updates and, when present,
/// replaces the friendship list in the same transaction.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    user: AuthUser,
    Json(input): Json<UpdateCharacterRequest>,
) -> AppResult<Json<CharacterWithFriendships>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    validate_bounds(input.age.unwrap_or(0), input.height.unwrap_or(0.0))?;

    let existing = require_owned(&state, id, &user).await?;

    let update_dto = UpdateCharacter {
        name: input.name,
        player_name: input.player_name,
        age: input.age,
        height: input.height,
        rpg_system: input.rpg_system,
        story: input.story,
        image_url: None,
        friendships: input.friendships.map(to_entries),
    };

    let character = CharacterRepo::update(&state.pool, existing.id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))?;

    state
        .event_bus
        .publish(GalleryEvent::character_changed(id, user.user_id));
    Ok(Json(character))
}

/// DELETE /api/v1/characters/{id}
///
/// Owner or admin only. Friendships and votes cascade away with the row.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    user: AuthUser,
) -> AppResult<StatusCode> {
    require_owned(&state, id, &user).await?;

    let deleted = CharacterRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }));
    }

    state
        .event_bus
        .publish(GalleryEvent::character_deleted(id, user.user_id));
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a character and verify the caller owns it or is an admin.
pub(crate) async fn require_owned(
    state: &AppState,
    id: DbId,
    user: &AuthUser,
) -> AppResult<Character> {
    let character = CharacterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))?;

    if character.user_id != user.user_id && !user.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the character's owner or an admin may modify it".into(),
        )));
    }
    Ok(character)
}

/// Upper-bound checks the `validator` range attribute cannot express for
/// our mixed int/float fields without repeating literals.
fn validate_bounds(age: i32, height: f64) -> AppResult<()> {
    if age > AGE_MAX {
        return Err(AppError::Core(CoreError::Validation(format!(
            "age must be at most {AGE_MAX}"
        ))));
    }
    if height > HEIGHT_MAX {
        return Err(AppError::Core(CoreError::Validation(format!(
            "height must be at most {HEIGHT_MAX} meters"
        ))));
    }
    Ok(())
}

/// Convert validated friendship inputs into repository entries, dropping
/// entries whose names are blank after trimming.
fn to_entries(inputs: Vec<FriendshipInput>) -> Vec<FriendshipEntry> {
    inputs
        .into_iter()
        .filter(|f| !f.friend_name.trim().is_empty())
        .map(|f| FriendshipEntry {
            friend_name: f.friend_name.trim().chars().take(NAME_MAX_LEN).collect(),
            friendship_level: f.friendship_level,
        })
        .collect()
}
