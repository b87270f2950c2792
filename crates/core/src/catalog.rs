//! Catalog vocabulary shared by the repository and API layers: lifecycle
//! and pricing constants, sort keys, and search-input validation.

use serde::Deserialize;

use crate::error::CoreError;

/// Catalog pages are a fixed twelve entries.
pub const PAGE_SIZE: i64 = 12;

/// Free-text queries shorter than this (after trimming) are rejected.
pub const MIN_QUERY_LEN: usize = 2;

/// Lifecycle statuses for a catalog entry.
pub mod status {
    pub const DRAFT: &str = "draft";
    pub const PUBLISHED: &str = "published";
    pub const ARCHIVED: &str = "archived";
    pub const MODERATED: &str = "moderated";

    pub fn is_valid(value: &str) -> bool {
        matches!(value, DRAFT | PUBLISHED | ARCHIVED | MODERATED)
    }
}

/// Pricing models for a catalog entry.
pub mod price_type {
    pub const FREE: &str = "free";
    pub const PAID: &str = "paid";

    pub fn is_valid(value: &str) -> bool {
        matches!(value, FREE | PAID)
    }
}

/// Difficulty levels attached to entries for filtering.
pub mod difficulty {
    pub const BEGINNER: &str = "beginner";
    pub const INTERMEDIATE: &str = "intermediate";
    pub const ADVANCED: &str = "advanced";
    pub const EXPERT: &str = "expert";

    pub fn is_valid(value: &str) -> bool {
        matches!(value, BEGINNER | INTERMEDIATE | ADVANCED | EXPERT)
    }
}

/// Sort strategies accepted by the catalog query engine.
///
/// Every strategy tie-breaks on entry id descending so orderings are
/// stable and deterministic across identical requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSort {
    /// Creation time, newest first (the default).
    #[default]
    Newest,
    Oldest,
    /// Total engagement (views + downloads + purchases + favorites), highest first.
    Popular,
    /// Average review rating, highest first; zero-review entries rate as 0.
    Rating,
    PriceLow,
    PriceHigh,
}

/// Validate and normalize a free-text catalog query.
///
/// Returns `None` for absent or whitespace-only input (no text filter),
/// the trimmed query when it is long enough, and `InvalidFilter` when a
/// non-empty query is shorter than [`MIN_QUERY_LEN`].
pub fn validate_query(raw: Option<&str>) -> Result<Option<String>, CoreError> {
    let trimmed = match raw {
        Some(q) => q.trim(),
        None => return Ok(None),
    };
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() < MIN_QUERY_LEN {
        return Err(CoreError::InvalidFilter(format!(
            "search query must be at least {MIN_QUERY_LEN} characters"
        )));
    }
    Ok(Some(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_query_is_no_filter() {
        assert_eq!(validate_query(None).unwrap(), None);
        assert_eq!(validate_query(Some("   ")).unwrap(), None);
    }

    #[test]
    fn short_query_is_rejected() {
        let err = validate_query(Some("c")).unwrap_err();
        assert!(matches!(err, CoreError::InvalidFilter(_)));
    }

    #[test]
    fn query_is_trimmed() {
        assert_eq!(validate_query(Some("  cat ")).unwrap().as_deref(), Some("cat"));
    }

    #[test]
    fn default_sort_is_newest() {
        assert_eq!(CatalogSort::default(), CatalogSort::Newest);
    }
}
