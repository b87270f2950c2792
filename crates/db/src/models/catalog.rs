//! Filter, page, and result types for the catalog query engine.

use promptmart_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Validated filter for a catalog search.
///
/// `query` has already passed `promptmart_core::catalog::validate_query`;
/// the engine always restricts to published, active entries on top of
/// whatever is set here.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub query: Option<String>,
    pub category_id: Option<DbId>,
    pub price_type: Option<String>,
    pub min_rating: Option<f64>,
    pub max_price: Option<Decimal>,
    pub tag_ids: Option<Vec<DbId>>,
    pub difficulty_level: Option<String>,
}

/// A catalog listing row: the entry plus the computed rating aggregate and
/// engagement score used for display and sorting.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CatalogEntry {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub preview_content: String,
    pub author_id: DbId,
    pub category_id: DbId,
    pub price_type: String,
    pub price: Decimal,
    pub difficulty_level: String,
    pub views: i64,
    pub downloads: i64,
    pub purchases: i64,
    pub favorites: i64,
    pub average_rating: f64,
    pub rating_count: i64,
    pub engagement: i64,
    pub created_at: Timestamp,
    pub published_at: Option<Timestamp>,
}

/// One page of results plus the total match count for pagination UI.
#[derive(Debug, Clone, Serialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, page_size: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + page_size - 1) / page_size
        };
        Self {
            items,
            total,
            page,
            page_size,
            total_pages,
        }
    }
}
