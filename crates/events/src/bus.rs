//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`GalleryEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taverna_core::types::DbId;
use taverna_core::vote::VoteAggregate;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// GalleryEvent
// ---------------------------------------------------------------------------

/// Whether a vote toggle recorded a choice or retracted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteAction {
    Recorded,
    Retracted,
}

/// A mutation to a character or its vote set.
///
/// Every event names the character it belongs to so the feed router can
/// fan it out to exactly the connections subscribed to that character.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GalleryEvent {
    /// A vote was recorded, replaced, or retracted. Carries the fresh
    /// aggregate so subscribers need not re-query to converge.
    VoteChanged {
        character_id: DbId,
        /// The voter. Clients matching this id also refresh their own vote.
        actor_user_id: DbId,
        action: VoteAction,
        aggregate: VoteAggregate,
        timestamp: DateTime<Utc>,
    },
    /// A character was created or its fields/friendships updated.
    CharacterChanged {
        character_id: DbId,
        actor_user_id: DbId,
        timestamp: DateTime<Utc>,
    },
    /// A character was deleted; its votes and friendships are gone with it.
    CharacterDeleted {
        character_id: DbId,
        actor_user_id: DbId,
        timestamp: DateTime<Utc>,
    },
}

impl GalleryEvent {
    /// The character this event is scoped to.
    pub fn character_id(&self) -> DbId {
        match self {
            GalleryEvent::VoteChanged { character_id, .. }
            | GalleryEvent::CharacterChanged { character_id, .. }
            | GalleryEvent::CharacterDeleted { character_id, .. } => *character_id,
        }
    }

    pub fn vote_changed(
        character_id: DbId,
        actor_user_id: DbId,
        action: VoteAction,
        aggregate: VoteAggregate,
    ) -> Self {
        GalleryEvent::VoteChanged {
            character_id,
            actor_user_id,
            action,
            aggregate,
            timestamp: Utc::now(),
        }
    }

    pub fn character_changed(character_id: DbId, actor_user_id: DbId) -> Self {
        GalleryEvent::CharacterChanged {
            character_id,
            actor_user_id,
            timestamp: Utc::now(),
        }
    }

    pub fn character_deleted(character_id: DbId, actor_user_id: DbId) -> Self {
        GalleryEvent::CharacterDeleted {
            character_id,
            actor_user_id,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`GalleryEvent`].
pub struct EventBus {
    sender: broadcast::Sender<GalleryEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// aggregates are always recomputable from the vote table.
    pub fn publish(&self, event: GalleryEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<GalleryEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
