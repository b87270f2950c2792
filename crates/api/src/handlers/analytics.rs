//! Handlers for analytics: daily rollups, snapshot history, and the
//! creator overview.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use promptmart_core::error::CoreError;
use promptmart_core::types::DbId;
use promptmart_db::repositories::{AnalyticsRepo, PromptRepo};

use crate::error::{AppError, AppResult};
use crate::identity::Identity;
use crate::query::{DateParams, LimitParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Default number of daily snapshots returned by the history endpoint.
const DEFAULT_SNAPSHOT_LIMIT: i64 = 30;

/// POST /api/v1/prompts/{id}/analytics/rollup
///
/// Recompute the prompt's daily snapshot for the given UTC date (default:
/// today). Idempotent: re-running over the same events produces the same
/// snapshot. Author only.
pub async fn rollup(
    identity: Identity,
    State(state): State<AppState>,
    Path(prompt_id): Path<DbId>,
    Query(params): Query<DateParams>,
) -> AppResult<impl IntoResponse> {
    require_author(&state, prompt_id, identity.user_id).await?;

    let date = params.date.unwrap_or_else(|| Utc::now().date_naive());
    let snapshot = AnalyticsRepo::rollup_day(&state.pool, prompt_id, date).await?;

    Ok(Json(DataResponse { data: snapshot }))
}

/// GET /api/v1/prompts/{id}/analytics
///
/// The prompt's daily snapshots, newest first. Author only.
pub async fn list_snapshots(
    identity: Identity,
    State(state): State<AppState>,
    Path(prompt_id): Path<DbId>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    require_author(&state, prompt_id, identity.user_id).await?;

    let limit = params.limit.unwrap_or(DEFAULT_SNAPSHOT_LIMIT);
    let snapshots = AnalyticsRepo::list_for_prompt(&state.pool, prompt_id, limit).await?;

    Ok(Json(DataResponse { data: snapshots }))
}

/// GET /api/v1/creator/overview
///
/// Lifetime aggregates across the caller's prompts. Earnings sum the
/// actual completed purchase amounts.
pub async fn creator_overview(
    identity: Identity,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let overview = AnalyticsRepo::creator_overview(&state.pool, identity.user_id).await?;

    Ok(Json(DataResponse { data: overview }))
}

async fn require_author(state: &AppState, prompt_id: DbId, user_id: DbId) -> AppResult<()> {
    let prompt = PromptRepo::find_by_id(&state.pool, prompt_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Prompt",
            id: prompt_id,
        }))?;

    if prompt.author_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "only the author can view this entry's analytics".into(),
        )));
    }

    Ok(())
}
