pub mod admin;
pub mod auth;
pub mod character;
pub mod health;
pub mod user;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                  gallery change feed WebSocket
///
/// /auth/register                       register (public)
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (requires auth)
///
/// /characters                          list, create
/// /characters/grouped                  gallery listing grouped by system
/// /characters/{id}                     get, update, delete
/// /characters/{id}/image               upload image (multipart)
/// /characters/{id}/votes               aggregate (GET), toggle (POST)
/// /characters/{id}/votes/me            caller's vote + aggregate
///
/// /users/me                            profile
/// /users/me/characters                 caller's characters
///
/// /admin/stats                         gallery counters (admin only)
/// /admin/characters                    listing with owners (admin only)
/// /admin/characters/{id}               delete any character (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/auth", auth::router())
        .nest("/characters", character::router())
        .nest("/users", user::router())
        .nest("/admin", admin::router())
}
