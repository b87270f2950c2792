//! Shared query parameter types for API handlers.

use promptmart_core::catalog::CatalogSort;
use promptmart_core::types::DbId;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Query parameters for `GET /catalog/search`.
///
/// `tags` is a comma-separated list of tag ids; filters left out of the
/// request are simply not applied.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogSearchParams {
    pub q: Option<String>,
    pub category_id: Option<DbId>,
    pub price_type: Option<String>,
    pub min_rating: Option<f64>,
    pub max_price: Option<Decimal>,
    pub tags: Option<String>,
    pub difficulty: Option<String>,
    #[serde(default)]
    pub sort: CatalogSort,
    pub page: Option<i64>,
}

impl CatalogSearchParams {
    /// Parse the comma-separated `tags` parameter into tag ids.
    pub fn tag_ids(&self) -> AppResult<Option<Vec<DbId>>> {
        let Some(raw) = self.tags.as_deref() else {
            return Ok(None);
        };
        let ids = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<DbId>()
                    .map_err(|_| AppError::BadRequest(format!("invalid tag id '{s}'")))
            })
            .collect::<AppResult<Vec<_>>>()?;
        Ok(if ids.is_empty() { None } else { Some(ids) })
    }
}

/// Sort and page parameters for category/tag prompt listings, which run
/// through the search engine with the taxonomy filter pre-set.
#[derive(Debug, Default, Deserialize)]
pub struct ShelfPageParams {
    #[serde(default)]
    pub sort: CatalogSort,
    pub page: Option<i64>,
}

/// Generic `?limit=` parameter for list endpoints.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

/// Optional `?date=YYYY-MM-DD` parameter for analytics endpoints.
#[derive(Debug, Deserialize)]
pub struct DateParams {
    pub date: Option<chrono::NaiveDate>,
}
