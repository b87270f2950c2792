use promptmart_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `tags` table.
///
/// `usage_count` is a denormalized count of prompts carrying the tag,
/// maintained by the attach/detach operations (floored at zero).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub usage_count: i32,
    pub created_at: Timestamp,
}
