//! Handlers for reviews: upsert, listing, and helpful votes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use promptmart_core::error::CoreError;
use promptmart_core::types::DbId;
use promptmart_db::models::review::UpsertReview;
use promptmart_db::repositories::{PromptRepo, ReviewRepo};

use crate::error::{AppError, AppResult};
use crate::identity::Identity;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default number of reviews returned by the list endpoint.
const DEFAULT_REVIEW_LIMIT: i64 = 50;

/// POST /api/v1/prompts/{id}/reviews
///
/// Add a review, or overwrite the caller's existing one. One review per
/// (prompt, user); a second submission updates rating/title/comment in
/// place rather than erroring.
pub async fn upsert_review(
    identity: Identity,
    State(state): State<AppState>,
    Path(prompt_id): Path<DbId>,
    Json(input): Json<UpsertReview>,
) -> AppResult<impl IntoResponse> {
    if !(1..=5).contains(&input.rating) {
        return Err(AppError::BadRequest(
            "rating must be between 1 and 5".into(),
        ));
    }

    let exists = PromptRepo::find_by_id(&state.pool, prompt_id).await?.is_some();
    if !exists {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Prompt",
            id: prompt_id,
        }));
    }

    let review = ReviewRepo::upsert(&state.pool, prompt_id, identity.user_id, &input).await?;

    tracing::info!(
        prompt_id,
        user_id = identity.user_id,
        rating = review.rating,
        "Review submitted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// GET /api/v1/prompts/{id}/reviews
///
/// A prompt's reviews, newest first, with the computed verified flag.
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(prompt_id): Path<DbId>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_REVIEW_LIMIT);
    let reviews = ReviewRepo::list_for_prompt(&state.pool, prompt_id, limit).await?;

    Ok(Json(DataResponse { data: reviews }))
}

/// POST /api/v1/reviews/{id}/helpful
///
/// Count a helpful vote on a review.
pub async fn add_helpful_vote(
    _identity: Identity,
    State(state): State<AppState>,
    Path(review_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let counted = ReviewRepo::add_helpful_vote(&state.pool, review_id).await?;

    if !counted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id: review_id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}
