//! Route definitions for the `/admin` resource. Handlers reject
//! non-admin callers via the `RequireAdmin` extractor.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /stats            -> stats
/// GET    /characters       -> list_characters
/// DELETE /characters/{id}  -> delete_character
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(admin::stats))
        .route("/characters", get(admin::list_characters))
        .route("/characters/{id}", delete(admin::delete_character))
}
