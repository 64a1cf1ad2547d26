//! Event-to-subscriber routing for the live vote feed.
//!
//! [`VoteFeedRouter`] consumes the gallery event bus and forwards each
//! event, as a JSON text frame, to every WebSocket connection subscribed
//! to the affected character. Clients compare the event's
//! `actor_user_id` against their own id to decide whether to also
//! refresh their stored vote.

use std::sync::Arc;

use axum::extract::ws::Message;
use taverna_events::GalleryEvent;
use tokio::sync::broadcast;

use crate::ws::WsManager;

/// Routes gallery events to character-feed subscribers.
pub struct VoteFeedRouter {
    ws_manager: Arc<WsManager>,
}

impl VoteFeedRouter {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the main routing loop.
    ///
    /// Subscribes to the event bus via `receiver` and forwards each event.
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](taverna_events::EventBus) is dropped at shutdown).
    pub async fn run(self, mut receiver: broadcast::Receiver<GalleryEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.forward(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    // Dropped events are safe to skip: the next event for a
                    // character carries the full fresh aggregate.
                    tracing::warn!(skipped = n, "Vote feed router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, vote feed router shutting down");
                    break;
                }
            }
        }
    }

    /// Serialize one event and push it to the character's subscribers.
    async fn forward(&self, event: &GalleryEvent) {
        let payload = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize gallery event");
                return;
            }
        };

        let character_id = event.character_id();
        let delivered = self
            .ws_manager
            .send_to_subscribers(character_id, Message::Text(payload.into()))
            .await;
        tracing::debug!(character_id, delivered, "Forwarded gallery event");
    }
}
