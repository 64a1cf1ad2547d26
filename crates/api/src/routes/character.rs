//! Route definitions for the `/characters` resource, including the
//! nested vote and image sub-resources.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{character, upload, vote};
use crate::state::AppState;

/// Routes mounted at `/characters`.
///
/// ```text
/// GET    /                 -> list      (?rpg_system= filter)
/// POST   /                 -> create    (auth)
/// GET    /grouped          -> list_grouped
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update    (owner or admin)
/// DELETE /{id}             -> delete    (owner or admin)
/// POST   /{id}/image       -> upload_image (owner or admin)
/// GET    /{id}/votes       -> aggregate (public)
/// POST   /{id}/votes       -> toggle    (auth)
/// GET    /{id}/votes/me    -> my_vote   (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(character::list).post(character::create))
        .route("/grouped", get(character::list_grouped))
        .route(
            "/{id}",
            get(character::get_by_id)
                .put(character::update)
                .delete(character::delete),
        )
        .route("/{id}/image", post(upload::upload_image))
        .route("/{id}/votes", get(vote::aggregate).post(vote::toggle))
        .route("/{id}/votes/me", get(vote::my_vote))
}
