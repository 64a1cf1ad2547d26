//! Repository for the `character_votes` table.
//!
//! The unique (character_id, user_id) constraint is the server-side
//! guarantee behind "at most one vote per user per character"; every
//! toggle resolves to exactly one atomic statement here, never a
//! delete-then-insert pair that could expose a zero-vote window.

use sqlx::PgPool;
use taverna_core::types::DbId;
use taverna_core::vote::{VoteAggregate, VoteChoice};

use crate::models::vote::CharacterVote;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, character_id, user_id, vote_type, created_at, updated_at";

/// Provides toggle writes and aggregate reads for character votes.
pub struct VoteRepo;

impl VoteRepo {
    /// Current like/dislike counts for a character. `{0,0}` when no votes
    /// exist; never an error for an unknown character id.
    pub async fn aggregate(
        pool: &PgPool,
        character_id: DbId,
    ) -> Result<VoteAggregate, sqlx::Error> {
        let (likes, dislikes): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*) FILTER (WHERE vote_type = 'like'),
                    COUNT(*) FILTER (WHERE vote_type = 'dislike')
             FROM character_votes
             WHERE character_id = $1",
        )
        .bind(character_id)
        .fetch_one(pool)
        .await?;
        Ok(VoteAggregate { likes, dislikes })
    }

    /// The given user's current vote for a character, if any.
    pub async fn find_user_vote(
        pool: &PgPool,
        character_id: DbId,
        user_id: DbId,
    ) -> Result<Option<VoteChoice>, sqlx::Error> {
        let vote_type: Option<String> = sqlx::query_scalar(
            "SELECT vote_type FROM character_votes
             WHERE character_id = $1 AND user_id = $2",
        )
        .bind(character_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(vote_type.as_deref().and_then(VoteChoice::parse))
    }

    /// Record or replace the user's vote with a single atomic upsert keyed
    /// on (character_id, user_id).
    pub async fn upsert(
        pool: &PgPool,
        character_id: DbId,
        user_id: DbId,
        choice: VoteChoice,
    ) -> Result<CharacterVote, sqlx::Error> {
        let query = format!(
            "INSERT INTO character_votes (character_id, user_id, vote_type)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_character_votes_character_user
             DO UPDATE SET vote_type = EXCLUDED.vote_type, updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CharacterVote>(&query)
            .bind(character_id)
            .bind(user_id)
            .bind(choice.as_str())
            .fetch_one(pool)
            .await
    }

    /// Delete the user's vote, but only if it still matches `choice`.
    ///
    /// The condition makes a retraction that races with a concurrent
    /// switch from the same user a no-op instead of wiping the newer vote.
    /// Returns `true` if a row was removed.
    pub async fn retract(
        pool: &PgPool,
        character_id: DbId,
        user_id: DbId,
        choice: VoteChoice,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM character_votes
             WHERE character_id = $1 AND user_id = $2 AND vote_type = $3",
        )
        .bind(character_id)
        .bind(user_id)
        .bind(choice.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of votes across all characters. Used by admin stats.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM character_votes")
            .fetch_one(pool)
            .await
    }
}
