//! Handlers for the public catalog: search and the featured/trending
//! shelves. All three only ever expose published, active entries.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use promptmart_core::catalog::{difficulty, price_type, validate_query, PAGE_SIZE};
use promptmart_core::error::CoreError;
use promptmart_db::models::catalog::CatalogFilter;
use promptmart_db::repositories::CatalogRepo;

use crate::error::{AppError, AppResult};
use crate::query::{CatalogSearchParams, LimitParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Default number of entries on the featured/trending shelves.
const DEFAULT_SHELF_LIMIT: i64 = PAGE_SIZE;

/// GET /api/v1/catalog/search
///
/// Filtered, sorted, paginated catalog search. A free-text query shorter
/// than two characters is rejected; an absent or blank one means no text
/// filter. Pages are a fixed twelve entries; a page past the end returns
/// an empty page with the true total.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<CatalogSearchParams>,
) -> AppResult<impl IntoResponse> {
    let query = validate_query(params.q.as_deref())?;

    if let Some(pt) = params.price_type.as_deref() {
        if !price_type::is_valid(pt) {
            return Err(AppError::Core(CoreError::InvalidFilter(format!(
                "unknown price type '{pt}'"
            ))));
        }
    }
    if let Some(level) = params.difficulty.as_deref() {
        if !difficulty::is_valid(level) {
            return Err(AppError::Core(CoreError::InvalidFilter(format!(
                "unknown difficulty level '{level}'"
            ))));
        }
    }

    let filter = CatalogFilter {
        query,
        category_id: params.category_id,
        price_type: params.price_type.clone(),
        min_rating: params.min_rating,
        max_price: params.max_price,
        tag_ids: params.tag_ids()?,
        difficulty_level: params.difficulty.clone(),
    };

    let page = params.page.unwrap_or(1);
    let result = CatalogRepo::search(&state.pool, &filter, params.sort, page).await?;

    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/catalog/featured
///
/// Entries over both featured thresholds, highest engagement first.
pub async fn featured(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_SHELF_LIMIT);
    let entries = CatalogRepo::featured(&state.pool, limit).await?;

    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/catalog/trending
///
/// Entries with enough download/purchase activity in the trailing window,
/// most active first. Recomputed on every request.
pub async fn trending(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_SHELF_LIMIT);
    let entries = CatalogRepo::trending(&state.pool, Utc::now(), limit).await?;

    Ok(Json(DataResponse { data: entries }))
}
