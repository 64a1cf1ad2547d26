use std::sync::Arc;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: taverna_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager for the vote change feed.
    pub ws_manager: Arc<WsManager>,
    /// Event bus carrying character and vote mutations.
    pub event_bus: Arc<taverna_events::EventBus>,
}
