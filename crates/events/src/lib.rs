//! Taverna in-process event bus.
//!
//! Character and vote mutations publish a [`GalleryEvent`] here; the API
//! crate's vote feed router consumes the bus and pushes updates to
//! WebSocket subscribers so every observer of a character converges on
//! the same aggregate.

pub mod bus;

pub use bus::{EventBus, GalleryEvent, VoteAction};
