use chrono::NaiveDate;
use promptmart_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `prompt_analytics` table: the idempotent daily snapshot
/// of one prompt's event activity.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyAnalytics {
    pub id: DbId,
    pub prompt_id: DbId,
    pub date: NaiveDate,
    pub views: i64,
    pub downloads: i64,
    pub purchases: i64,
    pub revenue: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Aggregate figures for a creator's dashboard.
///
/// Earnings here sum the actual completed purchase amounts, unlike the
/// scorer's `total_earnings`, which multiplies the current price.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CreatorOverview {
    pub total_prompts: i64,
    pub published_prompts: i64,
    pub total_downloads: i64,
    pub total_purchases: i64,
    pub total_earnings: Decimal,
}
