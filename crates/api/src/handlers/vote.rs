//! Handlers for character votes.
//!
//! `POST /characters/{id}/votes` is the single voting entry point: it
//! toggles. Voting the same way twice retracts; a different choice
//! replaces the stored vote in one upsert. Every successful write
//! publishes a fresh aggregate on the event bus for live feeds.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use taverna_core::error::CoreError;
use taverna_core::types::DbId;
use taverna_core::vote::{decide_toggle, ToggleAction, VoteAggregate, VoteChoice};
use taverna_db::repositories::{CharacterRepo, VoteRepo};
use taverna_events::{GalleryEvent, VoteAction};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /characters/{id}/votes`.
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub vote_type: VoteChoice,
}

/// Response for vote toggles and for `GET .../votes/me`.
#[derive(Debug, Serialize)]
pub struct VoteStatus {
    /// The caller's vote after the operation, if any.
    pub user_vote: Option<VoteChoice>,
    pub aggregate: VoteAggregate,
}

/// Response for the public aggregate endpoint.
#[derive(Debug, Serialize)]
pub struct AggregateResponse {
    pub character_id: DbId,
    #[serde(flatten)]
    pub aggregate: VoteAggregate,
}

/// POST /api/v1/characters/{id}/votes
///
/// Toggle the caller's vote on a character.
pub async fn toggle(
    State(state): State<AppState>,
    Path(character_id): Path<DbId>,
    user: AuthUser,
    Json(input): Json<VoteRequest>,
) -> AppResult<Json<VoteStatus>> {
    if CharacterRepo::find_by_id(&state.pool, character_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id: character_id,
        }));
    }

    let current = VoteRepo::find_user_vote(&state.pool, character_id, user.user_id).await?;
    let (user_vote, action) = match decide_toggle(current, input.vote_type) {
        ToggleAction::Retract => {
            // Conditional on vote_type: a retraction racing a switch
            // becomes a no-op instead of deleting the newer vote.
            VoteRepo::retract(&state.pool, character_id, user.user_id, input.vote_type)
                .await
                .map_err(AppError::VoteWriteFailed)?;
            (None, VoteAction::Retracted)
        }
        ToggleAction::Record => {
            VoteRepo::upsert(&state.pool, character_id, user.user_id, input.vote_type)
                .await
                .map_err(AppError::VoteWriteFailed)?;
            (Some(input.vote_type), VoteAction::Recorded)
        }
    };

    let aggregate = VoteRepo::aggregate(&state.pool, character_id).await?;
    state.event_bus.publish(GalleryEvent::vote_changed(
        character_id,
        user.user_id,
        action,
        aggregate,
    ));

    Ok(Json(VoteStatus {
        user_vote,
        aggregate,
    }))
}

/// GET /api/v1/characters/{id}/votes
///
/// Public aggregate. An unknown or deleted character reads as zero
/// likes and zero dislikes rather than an error.
pub async fn aggregate(
    State(state): State<AppState>,
    Path(character_id): Path<DbId>,
) -> AppResult<Json<AggregateResponse>> {
    let aggregate = VoteRepo::aggregate(&state.pool, character_id).await?;
    Ok(Json(AggregateResponse {
        character_id,
        aggregate,
    }))
}

/// GET /api/v1/characters/{id}/votes/me
///
/// The caller's own vote alongside the current aggregate, so clients
/// can render the vote buttons in the right state on load.
pub async fn my_vote(
    State(state): State<AppState>,
    Path(character_id): Path<DbId>,
    user: AuthUser,
) -> AppResult<Json<VoteStatus>> {
    let user_vote = VoteRepo::find_user_vote(&state.pool, character_id, user.user_id).await?;
    let aggregate = VoteRepo::aggregate(&state.pool, character_id).await?;
    Ok(Json(VoteStatus {
        user_vote,
        aggregate,
    }))
}
