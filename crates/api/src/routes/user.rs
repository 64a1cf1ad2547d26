//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Routes mounted at `/users`. All require authentication.
///
/// ```text
/// GET /me             -> me
/// GET /me/characters  -> my_characters
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(profile::me))
        .route("/me/characters", get(profile::my_characters))
}
