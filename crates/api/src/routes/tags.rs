//! Route definitions for tags, mounted at `/tags`.
//!
//! ```text
//! GET  /                 -> list_popular
//! POST /                 -> create_tag
//! GET  /{slug}           -> get_tag
//! GET  /{slug}/prompts   -> list_tag_prompts
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::tags;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tags::list_popular).post(tags::create_tag))
        .route("/{slug}", get(tags::get_tag))
        .route("/{slug}/prompts", get(tags::list_tag_prompts))
}
