//! Character vote entity model.

use sqlx::FromRow;
use taverna_core::types::{DbId, Timestamp};

/// A vote row from the `character_votes` table.
///
/// `vote_type` is the stored text form of
/// [`VoteChoice`](taverna_core::vote::VoteChoice); the unique
/// (character_id, user_id) constraint enforces one row per voter.
#[derive(Debug, Clone, FromRow)]
pub struct CharacterVote {
    pub id: DbId,
    pub character_id: DbId,
    pub user_id: DbId,
    pub vote_type: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
