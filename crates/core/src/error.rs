use crate::types::DbId;

/// Domain error taxonomy reported to the web layer as typed failures.
///
/// Idempotent operations (purchase completion, daily rollup) never raise
/// merely because they were already applied; re-invocation is defined as
/// success with no change and does not appear here.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Re-doing an already-done per-user action (double download,
    /// double favorite).
    #[error("Duplicate action: {0}")]
    DuplicateAction(String),

    /// Malformed search input, e.g. a free-text query under two characters.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// A lifecycle or pricing rule was violated, e.g. a paid purchase flow
    /// attempted on a free entry.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
