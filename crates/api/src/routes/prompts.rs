//! Route definitions for prompts, mounted at `/prompts`.
//!
//! The detail GET addresses by slug; every other id-segment route
//! addresses by numeric id. They share one path parameter because the
//! router requires a consistent name per position.
//!
//! ```text
//! POST   /                     -> create_prompt
//! GET    /mine                 -> list_mine
//! GET    /{id}                 -> get_prompt (slug-addressed)
//! PUT    /{id}                 -> update_prompt
//! DELETE /{id}                 -> delete_prompt
//! POST   /{id}/publish         -> publish_prompt
//! POST   /{id}/archive         -> archive_prompt
//! GET    /{id}/related         -> related_prompts
//! GET    /{id}/tags            -> list_prompt_tags
//! POST   /{id}/download        -> download_prompt
//! POST   /{id}/favorite        -> add_favorite
//! DELETE /{id}/favorite        -> remove_favorite
//! POST   /{id}/purchase        -> create_purchase
//! GET    /{id}/reviews         -> list_reviews
//! POST   /{id}/reviews         -> upsert_review
//! GET    /{id}/analytics       -> list_snapshots
//! POST   /{id}/analytics/rollup -> rollup
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{analytics, prompts, purchases, reviews};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(prompts::create_prompt))
        .route("/mine", get(prompts::list_mine))
        .route(
            "/{id}",
            get(prompts::get_prompt)
                .put(prompts::update_prompt)
                .delete(prompts::delete_prompt),
        )
        .route("/{id}/publish", post(prompts::publish_prompt))
        .route("/{id}/archive", post(prompts::archive_prompt))
        .route("/{id}/related", get(prompts::related_prompts))
        .route("/{id}/tags", get(prompts::list_prompt_tags))
        .route("/{id}/download", post(prompts::download_prompt))
        .route(
            "/{id}/favorite",
            post(prompts::add_favorite).delete(prompts::remove_favorite),
        )
        .route("/{id}/purchase", post(purchases::create_purchase))
        .route(
            "/{id}/reviews",
            get(reviews::list_reviews).post(reviews::upsert_review),
        )
        .route("/{id}/analytics", get(analytics::list_snapshots))
        .route("/{id}/analytics/rollup", post(analytics::rollup))
}
