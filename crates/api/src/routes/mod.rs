pub mod catalog;
pub mod categories;
pub mod health;
pub mod prompts;
pub mod purchases;
pub mod reviews;
pub mod tags;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /catalog/search                          filtered, sorted, paginated search
/// /catalog/featured                        featured shelf
/// /catalog/trending                        trending shelf
///
/// /prompts                                 create (POST)
/// /prompts/mine                            caller's own prompts (GET)
/// /prompts/{id}                            public detail (slug-addressed GET,
///                                          counts a view), update, delete
/// /prompts/{id}/publish                    publish (POST)
/// /prompts/{id}/archive                    archive (POST)
/// /prompts/{id}/related                    related entries (GET)
/// /prompts/{id}/tags                       attached tags (GET)
/// /prompts/{id}/download                   record download (POST)
/// /prompts/{id}/favorite                   favorite, unfavorite (POST, DELETE)
/// /prompts/{id}/purchase                   open purchase (POST)
/// /prompts/{id}/reviews                    list, upsert (GET, POST)
/// /prompts/{id}/analytics                  snapshot history (GET)
/// /prompts/{id}/analytics/rollup           recompute a day (POST)
///
/// /reviews/{id}/helpful                    helpful vote (POST)
///
/// /purchases/mine                          caller's purchases (GET)
/// /purchases/{transaction_id}/complete     gateway confirmation (POST)
/// /purchases/{transaction_id}/fail         gateway rejection (POST)
/// /purchases/{transaction_id}/refund       refund (POST)
///
/// /categories                              list, create (GET, POST)
/// /categories/{slug}                       get by slug (GET), update and
///                                          delete by id (PUT, DELETE)
/// /categories/{slug}/prompts               paged entries in category (GET)
///
/// /tags                                    popular list, create (GET, POST)
/// /tags/{slug}                             get (GET)
/// /tags/{slug}/prompts                     paged entries with tag (GET)
///
/// /creator/overview                        creator aggregates (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/catalog", catalog::router())
        .nest("/prompts", prompts::router())
        .nest("/reviews", reviews::router())
        .nest("/purchases", purchases::router())
        .nest("/categories", categories::router())
        .nest("/tags", tags::router())
        .route(
            "/creator/overview",
            get(handlers::analytics::creator_overview),
        )
}
