use std::collections::{HashMap, HashSet};

use axum::body::Bytes;
use axum::extract::ws::Message;
use taverna_core::types::{DbId, Timestamp};
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single WebSocket connection.
pub struct WsConnection {
    /// Character ids this connection wants vote-feed updates for.
    /// A `HashSet`, so re-subscribing to the same character is idempotent.
    pub subscriptions: HashSet<DbId>,
    /// Channel sender for outbound messages to this connection.
    pub sender: WsSender,
    /// When this connection was established.
    pub connected_at: Timestamp,
}

/// Manages all active WebSocket connections and their character subscriptions.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    /// Create a new, empty connection manager.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection with no subscriptions.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink.
    pub async fn add(&self, conn_id: String) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            subscriptions: HashSet::new(),
            sender: tx,
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Remove a connection by its ID, dropping all of its subscriptions.
    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Subscribe a connection to a character's vote feed.
    ///
    /// Returns `false` if the connection is unknown (already disconnected).
    pub async fn subscribe(&self, conn_id: &str, character_id: DbId) -> bool {
        let mut conns = self.connections.write().await;
        match conns.get_mut(conn_id) {
            Some(conn) => {
                conn.subscriptions.insert(character_id);
                true
            }
            None => false,
        }
    }

    /// Unsubscribe a connection from a character's vote feed.
    pub async fn unsubscribe(&self, conn_id: &str, character_id: DbId) {
        let mut conns = self.connections.write().await;
        if let Some(conn) = conns.get_mut(conn_id) {
            conn.subscriptions.remove(&character_id);
        }
    }

    /// Send a message to every connection subscribed to a character.
    ///
    /// Connections whose send channels are closed are silently skipped
    /// (they will be cleaned up on their next receive loop iteration).
    /// Returns the number of connections the message was sent to.
    pub async fn send_to_subscribers(&self, character_id: DbId, message: Message) -> usize {
        let conns = self.connections.read().await;
        let mut count = 0;
        for conn in conns.values() {
            if conn.subscriptions.contains(&character_id) {
                let _ = conn.sender.send(message.clone());
                count += 1;
            }
        }
        count
    }

    /// Return the current number of active connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Return the number of connections subscribed to a character.
    pub async fn subscriber_count(&self, character_id: DbId) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|c| c.subscriptions.contains(&character_id))
            .count()
    }

    /// Send a Close frame to every connection, then clear the map.
    ///
    /// Used during graceful shutdown to notify all clients before the
    /// server stops accepting new connections.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Send a Ping frame to every connected client.
    ///
    /// Used by the heartbeat task to keep connections alive and detect
    /// stale ones.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}
