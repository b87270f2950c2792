//! Catalog entry model and DTOs.
//!
//! The denormalized counters (`views`, `downloads`, `purchases`,
//! `favorites`) are a cache over the event tables; they are never settable
//! by clients and only move through the engagement operations.

use promptmart_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::engagement::UsageStats;

/// A row from the `prompts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Prompt {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub preview_content: String,
    pub author_id: DbId,
    pub category_id: DbId,
    pub price_type: String,
    pub price: Decimal,
    pub status: String,
    pub is_active: bool,
    pub difficulty_level: String,
    pub views: i64,
    pub downloads: i64,
    pub purchases: i64,
    pub favorites: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub published_at: Option<Timestamp>,
}

/// A prompt enriched with the scorer's derived metrics, returned by the
/// detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct PromptWithStats {
    #[serde(flatten)]
    pub prompt: Prompt,
    pub average_rating: f64,
    pub rating_count: i64,
    pub total_engagement: i64,
    pub conversion_rate: f64,
    pub total_earnings: Decimal,
    pub is_featured: bool,
    pub is_trending: bool,
    /// Downloads/purchases over the trailing 30 days.
    pub usage: UsageStats,
}

/// DTO for creating a prompt. Entries start as drafts; the slug is derived
/// from the title and de-duplicated with a numeric suffix.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePrompt {
    pub title: String,
    pub description: String,
    pub content: String,
    pub preview_content: Option<String>,
    pub category_id: DbId,
    pub price_type: Option<String>,
    pub price: Option<Decimal>,
    pub difficulty_level: Option<String>,
    /// Tag IDs to attach on creation.
    #[serde(default)]
    pub tag_ids: Vec<DbId>,
}

/// DTO for updating a prompt. Slug and counters are immutable.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePrompt {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub preview_content: Option<String>,
    pub category_id: Option<DbId>,
    pub price_type: Option<String>,
    pub price: Option<Decimal>,
    pub difficulty_level: Option<String>,
    pub is_active: Option<bool>,
    /// If `Some`, replaces all tag associations. If `None`, leaves unchanged.
    pub tag_ids: Option<Vec<DbId>>,
}
