//! Handlers for tags.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use promptmart_db::models::catalog::CatalogFilter;
use promptmart_db::repositories::{CatalogRepo, TagRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::identity::Identity;
use crate::query::{LimitParams, ShelfPageParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Default number of tags returned by the popular listing.
const DEFAULT_TAG_LIMIT: i64 = 30;

#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
}

/// GET /api/v1/tags
///
/// Tags by usage, most used first. Unused tags are omitted.
pub async fn list_popular(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_TAG_LIMIT);
    let tags = TagRepo::list_popular(&state.pool, limit).await?;

    Ok(Json(DataResponse { data: tags }))
}

/// GET /api/v1/tags/{slug}
pub async fn get_tag(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let tag = TagRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("tag '{slug}' not found")))?;

    Ok(Json(DataResponse { data: tag }))
}

/// GET /api/v1/tags/{slug}/prompts
///
/// Published entries carrying the tag, paged like a search with the tag
/// filter pre-set.
pub async fn list_tag_prompts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<ShelfPageParams>,
) -> AppResult<impl IntoResponse> {
    let tag = TagRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("tag '{slug}' not found")))?;

    let filter = CatalogFilter {
        tag_ids: Some(vec![tag.id]),
        ..CatalogFilter::default()
    };
    let page = params.page.unwrap_or(1);
    let result = CatalogRepo::search(&state.pool, &filter, params.sort, page).await?;

    Ok(Json(DataResponse { data: result }))
}

/// POST /api/v1/tags
///
/// Create a tag, or return the existing one for the normalized name.
pub async fn create_tag(
    identity: Identity,
    State(state): State<AppState>,
    Json(input): Json<CreateTagRequest>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }

    let tag = TagRepo::create_or_get(&state.pool, &input.name).await?;

    tracing::debug!(tag_id = tag.id, user_id = identity.user_id, "Tag ensured");

    Ok((StatusCode::CREATED, Json(DataResponse { data: tag })))
}
