//! Repository for the `characters` and `character_friendships` tables.
//!
//! Friendships are owned rows: every write path that touches them goes
//! through the character they belong to, and reads always embed them.

use sqlx::{PgExecutor, PgPool};
use taverna_core::types::DbId;

use crate::models::character::{
    Character, CharacterWithFriendships, CharacterWithOwner, CreateCharacter, Friendship,
    FriendshipEntry, RpgSystemCount, UpdateCharacter,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, player_name, age, height, rpg_system, story, \
                        image_url, created_at, updated_at";

/// Provides CRUD operations for characters plus their friendship lists.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a new character and its friendship list in one transaction,
    /// returning the created row with friendships embedded.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCharacter,
    ) -> Result<CharacterWithFriendships, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO characters (user_id, name, player_name, age, height, rpg_system, story, image_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let character = sqlx::query_as::<_, Character>(&query)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(&input.player_name)
            .bind(input.age)
            .bind(input.height)
            .bind(&input.rpg_system)
            .bind(&input.story)
            .bind(&input.image_url)
            .fetch_one(&mut *tx)
            .await?;

        let friendships =
            Self::insert_friendships(&mut *tx, character.id, &input.friendships).await?;

        tx.commit().await?;
        Ok(CharacterWithFriendships {
            character,
            friendships,
        })
    }

    /// Find a character by ID, without friendships.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a character by ID with its friendship list embedded.
    pub async fn find_with_friendships(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CharacterWithFriendships>, sqlx::Error> {
        let Some(character) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let friendships = Self::friendships_for(pool, id).await?;
        Ok(Some(CharacterWithFriendships {
            character,
            friendships,
        }))
    }

    /// List characters newest-first, optionally filtered by game system,
    /// with friendships embedded.
    pub async fn list(
        pool: &PgPool,
        rpg_system: Option<&str>,
    ) -> Result<Vec<CharacterWithFriendships>, sqlx::Error> {
        let characters = match rpg_system {
            Some(system) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM characters
                     WHERE rpg_system = $1
                     ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, Character>(&query)
                    .bind(system)
                    .fetch_all(pool)
                    .await?
            }
            None => {
                let query =
                    format!("SELECT {COLUMNS} FROM characters ORDER BY created_at DESC");
                sqlx::query_as::<_, Character>(&query).fetch_all(pool).await?
            }
        };
        Self::embed_friendships(pool, characters).await
    }

    /// List a user's own characters newest-first, with friendships embedded.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<CharacterWithFriendships>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM characters WHERE user_id = $1 ORDER BY created_at DESC"
        );
        let characters = sqlx::query_as::<_, Character>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        Self::embed_friendships(pool, characters).await
    }

    /// List all characters with their owner's username, newest-first.
    /// Used by the admin panel.
    pub async fn list_with_owner(pool: &PgPool) -> Result<Vec<CharacterWithOwner>, sqlx::Error> {
        sqlx::query_as::<_, CharacterWithOwner>(
            "SELECT c.id, c.user_id, u.username AS owner_username,
                    c.name, c.player_name, c.rpg_system, c.created_at
             FROM characters c
             JOIN users u ON u.id = c.user_id
             ORDER BY c.created_at DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Update a character's scalar fields and, when `input.friendships` is
    /// present, replace the friendship list, all in one transaction.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCharacter,
    ) -> Result<Option<CharacterWithFriendships>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE characters SET
                name = COALESCE($2, name),
                player_name = COALESCE($3, player_name),
                age = COALESCE($4, age),
                height = COALESCE($5, height),
                rpg_system = COALESCE($6, rpg_system),
                story = COALESCE($7, story),
                image_url = COALESCE($8, image_url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(character) = sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.player_name)
            .bind(input.age)
            .bind(input.height)
            .bind(&input.rpg_system)
            .bind(&input.story)
            .bind(&input.image_url)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let friendships = match &input.friendships {
            Some(entries) => {
                sqlx::query("DELETE FROM character_friendships WHERE character_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                Self::insert_friendships(&mut *tx, id, entries).await?
            }
            None => Self::friendships_for(&mut *tx, id).await?,
        };

        tx.commit().await?;
        Ok(Some(CharacterWithFriendships {
            character,
            friendships,
        }))
    }

    /// Set just the `image_url` column. Returns the updated row.
    pub async fn set_image_url(
        pool: &PgPool,
        id: DbId,
        image_url: &str,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET image_url = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(image_url)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a character. Friendships and votes cascade via
    /// foreign keys. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM characters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of characters.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM characters")
            .fetch_one(pool)
            .await
    }

    /// Character counts grouped by game system, largest group first.
    pub async fn count_by_system(pool: &PgPool) -> Result<Vec<RpgSystemCount>, sqlx::Error> {
        sqlx::query_as::<_, RpgSystemCount>(
            "SELECT rpg_system, COUNT(*) AS character_count
             FROM characters
             GROUP BY rpg_system
             ORDER BY character_count DESC, rpg_system ASC",
        )
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Friendship helpers
    // -----------------------------------------------------------------------

    /// Friendships for a single character, oldest entry first.
    async fn friendships_for<'e, E: PgExecutor<'e>>(
        executor: E,
        character_id: DbId,
    ) -> Result<Vec<Friendship>, sqlx::Error> {
        sqlx::query_as::<_, Friendship>(
            "SELECT id, character_id, friend_name, friendship_level
             FROM character_friendships
             WHERE character_id = $1
             ORDER BY id ASC",
        )
        .bind(character_id)
        .fetch_all(executor)
        .await
    }

    /// Insert friendship entries for a character, returning the created rows.
    async fn insert_friendships(
        conn: &mut sqlx::PgConnection,
        character_id: DbId,
        entries: &[FriendshipEntry],
    ) -> Result<Vec<Friendship>, sqlx::Error> {
        let mut rows = Vec::with_capacity(entries.len());
        for entry in entries {
            let row = sqlx::query_as::<_, Friendship>(
                "INSERT INTO character_friendships (character_id, friend_name, friendship_level)
                 VALUES ($1, $2, $3)
                 RETURNING id, character_id, friend_name, friendship_level",
            )
            .bind(character_id)
            .bind(&entry.friend_name)
            .bind(entry.friendship_level)
            .fetch_one(&mut *conn)
            .await?;
            rows.push(row);
        }
        Ok(rows)
    }

    /// Attach friendship lists to a batch of characters with one query.
    async fn embed_friendships(
        pool: &PgPool,
        characters: Vec<Character>,
    ) -> Result<Vec<CharacterWithFriendships>, sqlx::Error> {
        let ids: Vec<DbId> = characters.iter().map(|c| c.id).collect();
        let all = sqlx::query_as::<_, Friendship>(
            "SELECT id, character_id, friend_name, friendship_level
             FROM character_friendships
             WHERE character_id = ANY($1)
             ORDER BY id ASC",
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let mut result: Vec<CharacterWithFriendships> = characters
            .into_iter()
            .map(|character| CharacterWithFriendships {
                character,
                friendships: Vec::new(),
            })
            .collect();
        for friendship in all {
            if let Some(entry) = result
                .iter_mut()
                .find(|c| c.character.id == friendship.character_id)
            {
                entry.friendships.push(friendship);
            }
        }
        Ok(result)
    }
}
