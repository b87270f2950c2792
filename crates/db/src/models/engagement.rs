//! Event records backing the counter store: downloads and favorites.

use promptmart_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `downloads` table. One free download is counted per
/// (prompt, user) pair.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DownloadEvent {
    pub id: DbId,
    pub prompt_id: DbId,
    pub user_id: DbId,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
}

/// Optional network/client metadata recorded with a download.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// A row from the `favorites` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Favorite {
    pub id: DbId,
    pub user_id: DbId,
    pub prompt_id: DbId,
    pub created_at: Timestamp,
}

/// Downloads and purchases over a trailing window.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UsageStats {
    pub downloads: i64,
    pub purchases: i64,
    pub total: i64,
}
