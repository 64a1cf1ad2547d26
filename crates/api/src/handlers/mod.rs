//! Request handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod character;
pub mod profile;
pub mod upload;
pub mod vote;
