//! Domain types and pure logic for the Taverna character gallery.
//!
//! This crate has no I/O: it defines the shared ID/timestamp aliases, the
//! error taxonomy, role constants, character validation bounds, and the
//! vote toggle/aggregate model that the database and API layers build on.

pub mod character;
pub mod error;
pub mod roles;
pub mod types;
pub mod vote;
