use crate::types::DbId;

/// Domain errors raised by the leaderboard core.
///
/// Store failures are a separate type, [`crate::store::StoreError`], so that
/// callers can tell a bad request from a broken backend.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An id passed to a store write does not exist.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A request parameter failed hard validation (`page`, `limit`).
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
