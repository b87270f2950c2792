//! Handlers for the prompt lifecycle (create/update/publish/archive/delete),
//! the public detail view, and the per-user engagement actions (download,
//! favorite).

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use promptmart_core::catalog::{difficulty, price_type, status};
use promptmart_core::engagement;
use promptmart_core::error::CoreError;
use promptmart_core::types::DbId;
use promptmart_db::models::engagement::DownloadMeta;
use promptmart_db::models::prompt::{CreatePrompt, Prompt, PromptWithStats, UpdatePrompt};
use promptmart_db::repositories::{
    CatalogRepo, EngagementRepo, PromptRepo, PurchaseRepo, ReviewRepo, TagRepo, UserRepo,
};
use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};
use crate::identity::Identity;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Trailing window for the detail view's usage stats, in days.
const USAGE_WINDOW_DAYS: i64 = 30;

/// Default size of the related-entries list.
const DEFAULT_RELATED_LIMIT: i64 = 6;

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// POST /api/v1/prompts
///
/// Create a draft prompt. Requires the creator capability.
pub async fn create_prompt(
    identity: Identity,
    State(state): State<AppState>,
    Json(input): Json<CreatePrompt>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, identity.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: identity.user_id,
        }))?;
    if !user.is_creator {
        return Err(AppError::Core(CoreError::Forbidden(
            "only creators can publish to the catalog".into(),
        )));
    }

    validate_pricing(input.price_type.as_deref(), input.price)?;
    if let Some(level) = input.difficulty_level.as_deref() {
        if !difficulty::is_valid(level) {
            return Err(AppError::BadRequest(format!(
                "unknown difficulty level '{level}'"
            )));
        }
    }
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".into()));
    }

    let prompt = PromptRepo::create(&state.pool, identity.user_id, &input).await?;

    tracing::info!(
        prompt_id = prompt.id,
        user_id = identity.user_id,
        slug = %prompt.slug,
        "Prompt created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: prompt })))
}

/// GET /api/v1/prompts/mine
///
/// List the caller's own prompts, every status included, newest first.
pub async fn list_mine(
    identity: Identity,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let prompts = PromptRepo::list_by_author(&state.pool, identity.user_id).await?;

    Ok(Json(DataResponse { data: prompts }))
}

/// PUT /api/v1/prompts/{id}
///
/// Update a prompt's editable fields. Author only; slug and counters never
/// change here.
pub async fn update_prompt(
    identity: Identity,
    State(state): State<AppState>,
    Path(prompt_id): Path<DbId>,
    Json(input): Json<UpdatePrompt>,
) -> AppResult<impl IntoResponse> {
    let existing = require_author(&state, prompt_id, identity.user_id).await?;

    // Pricing must stay coherent after the partial update.
    let next_type = input
        .price_type
        .as_deref()
        .unwrap_or(&existing.price_type)
        .to_string();
    let next_price = input.price.unwrap_or(existing.price);
    validate_pricing(Some(&next_type), Some(next_price))?;
    if let Some(level) = input.difficulty_level.as_deref() {
        if !difficulty::is_valid(level) {
            return Err(AppError::BadRequest(format!(
                "unknown difficulty level '{level}'"
            )));
        }
    }

    let prompt = PromptRepo::update(&state.pool, prompt_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Prompt",
            id: prompt_id,
        }))?;

    tracing::info!(prompt_id, user_id = identity.user_id, "Prompt updated");

    Ok(Json(DataResponse { data: prompt }))
}

/// POST /api/v1/prompts/{id}/publish
///
/// Publish a prompt. `published_at` is set on the first publish only.
pub async fn publish_prompt(
    identity: Identity,
    State(state): State<AppState>,
    Path(prompt_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_author(&state, prompt_id, identity.user_id).await?;

    let prompt = PromptRepo::publish(&state.pool, prompt_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Prompt",
            id: prompt_id,
        }))?;

    tracing::info!(prompt_id, user_id = identity.user_id, "Prompt published");

    Ok(Json(DataResponse { data: prompt }))
}

/// POST /api/v1/prompts/{id}/archive
///
/// Archive a prompt, removing it from the public catalog. Counters and
/// events are kept.
pub async fn archive_prompt(
    identity: Identity,
    State(state): State<AppState>,
    Path(prompt_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_author(&state, prompt_id, identity.user_id).await?;

    let prompt = PromptRepo::set_status(&state.pool, prompt_id, status::ARCHIVED)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Prompt",
            id: prompt_id,
        }))?;

    tracing::info!(prompt_id, user_id = identity.user_id, "Prompt archived");

    Ok(Json(DataResponse { data: prompt }))
}

/// DELETE /api/v1/prompts/{id}
///
/// Delete a prompt and everything hanging off it (reviews, events,
/// snapshots). Author only.
pub async fn delete_prompt(
    identity: Identity,
    State(state): State<AppState>,
    Path(prompt_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_author(&state, prompt_id, identity.user_id).await?;

    PromptRepo::delete(&state.pool, prompt_id).await?;

    tracing::info!(prompt_id, user_id = identity.user_id, "Prompt deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Public detail view
// ---------------------------------------------------------------------------

/// GET /api/v1/prompts/{slug}
///
/// Public detail view of a published entry. Every hit counts a view (no
/// per-user dedup) and the response reflects the freshly counted view.
pub async fn get_prompt(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let found = PromptRepo::find_published_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("prompt '{slug}' not found")))?;

    EngagementRepo::record_view(&state.pool, found.id).await?;

    // Re-read so the view just counted is in the payload.
    let prompt = PromptRepo::find_by_id(&state.pool, found.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Prompt",
            id: found.id,
        }))?;

    let stats = assemble_stats(&state, prompt).await?;

    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/prompts/{id}/related
///
/// Published entries in the same category sharing at least one tag.
pub async fn related_prompts(
    State(state): State<AppState>,
    Path(prompt_id): Path<DbId>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_RELATED_LIMIT);
    let entries = CatalogRepo::related(&state.pool, prompt_id, limit).await?;

    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/prompts/{id}/tags
pub async fn list_prompt_tags(
    State(state): State<AppState>,
    Path(prompt_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tags = TagRepo::list_for_prompt(&state.pool, prompt_id).await?;

    Ok(Json(DataResponse { data: tags }))
}

// ---------------------------------------------------------------------------
// Engagement actions
// ---------------------------------------------------------------------------

/// POST /api/v1/prompts/{id}/download
///
/// Record a download for the caller. Each (prompt, user) pair counts once;
/// a repeat is a 409. Paid entries require a completed purchase first.
pub async fn download_prompt(
    identity: Identity,
    State(state): State<AppState>,
    Path(prompt_id): Path<DbId>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let prompt = require_published(&state, prompt_id).await?;

    if prompt.price_type == price_type::PAID {
        let purchased =
            PurchaseRepo::has_completed(&state.pool, prompt_id, identity.user_id).await?;
        if !purchased {
            return Err(AppError::Core(CoreError::Forbidden(
                "a completed purchase is required to download a paid entry".into(),
            )));
        }
    }

    let meta = DownloadMeta {
        ip_address: header_value(&headers, "x-forwarded-for"),
        user_agent: header_value(&headers, "user-agent"),
    };

    let event = EngagementRepo::record_download(&state.pool, prompt_id, identity.user_id, &meta)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::DuplicateAction(
                "entry already downloaded by this user".into(),
            ))
        })?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// POST /api/v1/prompts/{id}/favorite
///
/// Favorite the entry for the caller. A repeat is a 409.
pub async fn add_favorite(
    identity: Identity,
    State(state): State<AppState>,
    Path(prompt_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_published(&state, prompt_id).await?;

    let favorite = EngagementRepo::add_favorite(&state.pool, identity.user_id, prompt_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::DuplicateAction(
                "entry already favorited by this user".into(),
            ))
        })?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: favorite })))
}

/// DELETE /api/v1/prompts/{id}/favorite
///
/// Remove the caller's favorite. The counter never goes below zero.
pub async fn remove_favorite(
    identity: Identity,
    State(state): State<AppState>,
    Path(prompt_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let removed = EngagementRepo::remove_favorite(&state.pool, identity.user_id, prompt_id).await?;

    if !removed {
        return Err(AppError::NotFound("no favorite to remove".into()));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Assemble the detail payload: the row plus the scorer's derived metrics
/// and the trailing-window usage stats.
async fn assemble_stats(state: &AppState, prompt: Prompt) -> AppResult<PromptWithStats> {
    let now = Utc::now();

    let average_rating = ReviewRepo::average_rating(&state.pool, prompt.id).await?;
    let rating_count = ReviewRepo::rating_count(&state.pool, prompt.id).await?;
    let recent_activity = EngagementRepo::recent_activity(&state.pool, prompt.id, now).await?;
    let usage =
        EngagementRepo::usage_window(&state.pool, prompt.id, USAGE_WINDOW_DAYS, now).await?;

    let total_engagement = engagement::total_engagement(
        prompt.views,
        prompt.downloads,
        prompt.purchases,
        prompt.favorites,
    );

    Ok(PromptWithStats {
        average_rating,
        rating_count,
        total_engagement,
        conversion_rate: engagement::conversion_rate(
            prompt.views,
            prompt.downloads,
            prompt.purchases,
        ),
        total_earnings: engagement::total_earnings(
            &prompt.price_type,
            prompt.price,
            prompt.purchases,
        ),
        is_featured: engagement::is_featured(
            &prompt.status,
            prompt.is_active,
            total_engagement,
            average_rating,
        ),
        is_trending: engagement::is_trending(recent_activity),
        usage,
        prompt,
    })
}

/// Load a prompt and require the caller to be its author.
async fn require_author(state: &AppState, prompt_id: DbId, user_id: DbId) -> AppResult<Prompt> {
    let prompt = PromptRepo::find_by_id(&state.pool, prompt_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Prompt",
            id: prompt_id,
        }))?;

    if prompt.author_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "only the author can modify this entry".into(),
        )));
    }

    Ok(prompt)
}

/// Load a prompt and require it to be publicly visible.
async fn require_published(state: &AppState, prompt_id: DbId) -> AppResult<Prompt> {
    let prompt = PromptRepo::find_by_id(&state.pool, prompt_id)
        .await?
        .filter(|p| p.status == status::PUBLISHED && p.is_active)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Prompt",
            id: prompt_id,
        }))?;

    Ok(prompt)
}

/// Reject incoherent pricing: an unknown price type, a negative price, a
/// free entry carrying a price, or a paid entry without one.
fn validate_pricing(entry_price_type: Option<&str>, price: Option<Decimal>) -> AppResult<()> {
    let entry_price_type = entry_price_type.unwrap_or(price_type::FREE);
    if !price_type::is_valid(entry_price_type) {
        return Err(AppError::BadRequest(format!(
            "unknown price type '{entry_price_type}'"
        )));
    }

    let price = price.unwrap_or_default();
    if price < Decimal::ZERO {
        return Err(AppError::Core(CoreError::InvariantViolation(
            "price must not be negative".into(),
        )));
    }
    if entry_price_type == price_type::FREE && price > Decimal::ZERO {
        return Err(AppError::Core(CoreError::InvariantViolation(
            "free entries must have a zero price".into(),
        )));
    }
    if entry_price_type == price_type::PAID && price <= Decimal::ZERO {
        return Err(AppError::Core(CoreError::InvariantViolation(
            "paid entries must have a positive price".into(),
        )));
    }

    Ok(())
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
