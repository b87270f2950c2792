//! Handlers for catalog categories.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use promptmart_core::error::CoreError;
use promptmart_core::types::DbId;
use promptmart_db::models::catalog::CatalogFilter;
use promptmart_db::models::category::{CreateCategory, UpdateCategory};
use promptmart_db::repositories::{CatalogRepo, CategoryRepo};

use crate::error::{AppError, AppResult};
use crate::identity::Identity;
use crate::query::ShelfPageParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
///
/// Active categories with their published prompt counts, most populated
/// first.
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list_active(&state.pool).await?;

    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/categories/{slug}
pub async fn get_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category '{slug}' not found")))?;

    Ok(Json(DataResponse { data: category }))
}

/// GET /api/v1/categories/{slug}/prompts
///
/// Published entries in the category, paged like a search with the
/// category filter pre-set.
pub async fn list_category_prompts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<ShelfPageParams>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category '{slug}' not found")))?;

    let filter = CatalogFilter {
        category_id: Some(category.id),
        ..CatalogFilter::default()
    };
    let page = params.page.unwrap_or(1);
    let result = CatalogRepo::search(&state.pool, &filter, params.sort, page).await?;

    Ok(Json(DataResponse { data: result }))
}

/// POST /api/v1/categories
pub async fn create_category(
    identity: Identity,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }

    let category = CategoryRepo::create(&state.pool, &input).await?;

    tracing::info!(
        category_id = category.id,
        user_id = identity.user_id,
        "Category created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /api/v1/categories/{id}
pub async fn update_category(
    identity: Identity,
    State(state): State<AppState>,
    Path(category_id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::update(&state.pool, category_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id: category_id,
        }))?;

    tracing::info!(category_id, user_id = identity.user_id, "Category updated");

    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/categories/{id}
///
/// Deletes the category and cascade-deletes every prompt in it.
pub async fn delete_category(
    identity: Identity,
    State(state): State<AppState>,
    Path(category_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = CategoryRepo::delete(&state.pool, category_id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id: category_id,
        }));
    }

    tracing::info!(category_id, user_id = identity.user_id, "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}
