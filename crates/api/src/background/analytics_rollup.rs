//! Periodic daily-analytics rollup.
//!
//! Every hour, recomputes the daily snapshots for today and yesterday
//! (UTC) for every prompt with event activity on those days. Yesterday is
//! included so events that land near midnight still end up in the right
//! day's snapshot. The rollup is idempotent, so overlapping or repeated
//! runs are harmless.

use std::time::Duration;

use chrono::{Days, Utc};
use promptmart_db::repositories::AnalyticsRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// How often the rollup job runs.
const ROLLUP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the analytics rollup loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = ROLLUP_INTERVAL.as_secs(),
        "Analytics rollup job started"
    );

    let mut interval = tokio::time::interval(ROLLUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Analytics rollup job stopping");
                break;
            }
            _ = interval.tick() => {
                rollup_recent_days(&pool).await;
            }
        }
    }
}

/// Roll up today's and yesterday's snapshots for all active prompts.
async fn rollup_recent_days(pool: &PgPool) {
    let today = Utc::now().date_naive();
    let days = [today, today - Days::new(1)];

    for date in days {
        let prompt_ids = match AnalyticsRepo::prompt_ids_with_activity(pool, date).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(error = %e, date = %date, "Analytics rollup: activity scan failed");
                continue;
            }
        };

        let mut rolled = 0usize;
        for prompt_id in prompt_ids {
            match AnalyticsRepo::rollup_day(pool, prompt_id, date).await {
                Ok(_) => rolled += 1,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        prompt_id,
                        date = %date,
                        "Analytics rollup: snapshot failed"
                    );
                }
            }
        }

        if rolled > 0 {
            tracing::info!(rolled, date = %date, "Analytics rollup: snapshots refreshed");
        } else {
            tracing::debug!(date = %date, "Analytics rollup: no activity");
        }
    }
}
