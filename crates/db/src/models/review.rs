use promptmart_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `reviews` table. One review per (prompt, user).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub prompt_id: DbId,
    pub user_id: DbId,
    pub rating: i16,
    pub title: String,
    pub comment: String,
    pub is_verified_purchase: bool,
    pub helpful_votes: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A review with its `verified` flag computed at read time: the stored
/// flag OR any completed purchase by the reviewer for this prompt. Computed
/// rather than stored so it stays consistent when a purchase completes
/// after the review was written.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewWithVerification {
    pub id: DbId,
    pub prompt_id: DbId,
    pub user_id: DbId,
    pub rating: i16,
    pub title: String,
    pub comment: String,
    pub verified: bool,
    pub helpful_votes: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding or updating a review. A second submission from the same
/// user overwrites rating/title/comment in place.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertReview {
    pub rating: i16,
    pub title: Option<String>,
    pub comment: Option<String>,
}
