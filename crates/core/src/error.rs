//! Domain-level error taxonomy shared across crates.

use crate::types::DbId;

/// Errors produced by domain operations, independent of transport.
///
/// The API layer maps each variant onto an HTTP status and a stable
/// machine-readable error code.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist (or was deleted concurrently).
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed or out-of-range input, rejected before any write.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A uniqueness or state conflict.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid authentication.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed to perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}
