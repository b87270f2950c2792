//! Engagement scorer: pure functions deriving composite metrics from the
//! current counters and rating of a catalog entry.
//!
//! Thresholds are fixed policy constants, not user-configurable. None of
//! these functions touch the database; windowed inputs (the trailing
//! seven-day activity count) are supplied by the repository layer and
//! recomputed on every evaluation rather than cached.

use rust_decimal::Decimal;

use crate::catalog::{price_type, status};

/// An entry must exceed this total engagement to be featured.
pub const FEATURED_MIN_ENGAGEMENT: i64 = 100;

/// An entry must meet this average rating to be featured.
pub const FEATURED_MIN_RATING: f64 = 4.0;

/// Trailing lookback window for the trending flag, in days.
pub const TRENDING_WINDOW_DAYS: i64 = 7;

/// Downloads + completed purchases within the window required to trend.
pub const TRENDING_MIN_ACTIVITY: i64 = 10;

/// Total engagement: views + downloads + purchases + favorites.
pub fn total_engagement(views: i64, downloads: i64, purchases: i64, favorites: i64) -> i64 {
    views + downloads + purchases + favorites
}

/// Conversion rate from views to downloads/purchases, as a percentage.
///
/// An entry nobody has viewed converts at 0.0; this never divides by zero.
pub fn conversion_rate(views: i64, downloads: i64, purchases: i64) -> f64 {
    if views == 0 {
        return 0.0;
    }
    (downloads + purchases) as f64 / views as f64 * 100.0
}

/// Whether an entry qualifies for the featured shelf: published, active,
/// total engagement over [`FEATURED_MIN_ENGAGEMENT`], and average rating at
/// least [`FEATURED_MIN_RATING`].
pub fn is_featured(
    entry_status: &str,
    is_active: bool,
    total_engagement: i64,
    average_rating: f64,
) -> bool {
    entry_status == status::PUBLISHED
        && is_active
        && total_engagement > FEATURED_MIN_ENGAGEMENT
        && average_rating >= FEATURED_MIN_RATING
}

/// Whether an entry is trending, given its download + completed-purchase
/// count within the trailing [`TRENDING_WINDOW_DAYS`]-day window.
pub fn is_trending(recent_activity: i64) -> bool {
    recent_activity >= TRENDING_MIN_ACTIVITY
}

/// Lifetime earnings for an entry: zero for free entries, otherwise
/// `purchases * price`.
///
/// This multiplies the current price rather than summing the recorded
/// purchase amounts, so it assumes uniform pricing at evaluation time.
/// The creator overview sums actual amounts from the purchase events.
pub fn total_earnings(entry_price_type: &str, price: Decimal, purchases: i64) -> Decimal {
    if entry_price_type == price_type::FREE {
        return Decimal::ZERO;
    }
    price * Decimal::from(purchases)
}
