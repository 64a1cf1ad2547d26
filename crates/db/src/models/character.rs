//! Character and friendship entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taverna_core::types::{DbId, Timestamp};

/// A character row from the `characters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    /// Owning user.
    pub user_id: DbId,
    pub name: String,
    pub player_name: String,
    pub age: i32,
    /// Meters.
    pub height: f64,
    pub rpg_system: String,
    pub story: String,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A friendship row from the `character_friendships` table.
///
/// `friend_name` is free text, not a foreign key -- friends need not be
/// characters in the gallery, and duplicate names are allowed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Friendship {
    pub id: DbId,
    pub character_id: DbId,
    pub friend_name: String,
    /// Bounded to [0, 10] by a CHECK constraint.
    pub friendship_level: i32,
}

/// A character together with its embedded friendship list, as returned by
/// all read endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct CharacterWithFriendships {
    #[serde(flatten)]
    pub character: Character,
    pub friendships: Vec<Friendship>,
}

/// A character with its owner's username, for the admin listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CharacterWithOwner {
    pub id: DbId,
    pub user_id: DbId,
    pub owner_username: String,
    pub name: String,
    pub player_name: String,
    pub rpg_system: String,
    pub created_at: Timestamp,
}

/// Character count for one game system, from the admin stats query.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RpgSystemCount {
    pub rpg_system: String,
    pub character_count: i64,
}

/// DTO for a friendship entry embedded in character create/update input.
#[derive(Debug, Clone, Deserialize)]
pub struct FriendshipEntry {
    pub friend_name: String,
    pub friendship_level: i32,
}

/// DTO for creating a new character. `user_id` comes from the
/// authenticated caller, never from the request body.
#[derive(Debug, Clone)]
pub struct CreateCharacter {
    pub user_id: DbId,
    pub name: String,
    pub player_name: String,
    pub age: i32,
    pub height: f64,
    pub rpg_system: String,
    pub story: String,
    pub image_url: Option<String>,
    pub friendships: Vec<FriendshipEntry>,
}

/// DTO for updating an existing character. Scalar fields are optional;
/// `friendships`, when present, fully replaces the stored list.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCharacter {
    pub name: Option<String>,
    pub player_name: Option<String>,
    pub age: Option<i32>,
    pub height: Option<f64>,
    pub rpg_system: Option<String>,
    pub story: Option<String>,
    pub image_url: Option<String>,
    pub friendships: Option<Vec<FriendshipEntry>>,
}
