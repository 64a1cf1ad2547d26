//! Vote change-feed delivery.
//!
//! Bridges the in-process [`EventBus`](taverna_events::EventBus) to the
//! WebSocket subscribers tracked by [`WsManager`](crate::ws::WsManager).

mod router;

pub use router::VoteFeedRouter;
