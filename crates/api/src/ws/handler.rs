use std::sync::Arc;

use axum::extract::ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use taverna_core::types::DbId;

use crate::state::AppState;
use crate::ws::manager::WsManager;

/// Inbound client frame: subscribe to or unsubscribe from a character's
/// vote feed.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientFrame {
    Subscribe { character_id: DbId },
    Unsubscribe { character_id: DbId },
}

/// HTTP handler that upgrades the connection to WebSocket.
///
/// After the upgrade the connection is registered with `WsManager` and
/// managed by two tasks (sender + receiver).
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.ws_manager))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with `WsManager`.
///   2. Spawns a sender task that forwards messages from the manager channel.
///   3. Processes inbound subscribe/unsubscribe frames on the current task.
///   4. Cleans up on disconnect, dropping the connection's subscriptions.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    // Register and get the receiver for outbound messages.
    let mut rx = ws_manager.add(conn_id.clone()).await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: process inbound messages.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => {
                handle_client_frame(&ws_manager, &conn_id, &text).await;
            }
            Ok(_other) => {
                // Binary and Ping frames carry nothing we act on.
            }
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: remove connection (and its subscriptions) and stop the sender.
    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

/// Apply a single subscribe/unsubscribe frame. Malformed frames are
/// logged and ignored rather than closing the connection.
async fn handle_client_frame(ws_manager: &WsManager, conn_id: &str, text: &Utf8Bytes) {
    match serde_json::from_str::<ClientFrame>(text.as_str()) {
        Ok(ClientFrame::Subscribe { character_id }) => {
            ws_manager.subscribe(conn_id, character_id).await;
            tracing::debug!(conn_id = %conn_id, character_id, "Subscribed to vote feed");
        }
        Ok(ClientFrame::Unsubscribe { character_id }) => {
            ws_manager.unsubscribe(conn_id, character_id).await;
            tracing::debug!(conn_id = %conn_id, character_id, "Unsubscribed from vote feed");
        }
        Err(e) => {
            tracing::debug!(conn_id = %conn_id, error = %e, "Ignoring malformed client frame");
        }
    }
}
