//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Counter mutations are atomic
//! read-modify-write UPDATEs; wherever a dedup check and a counter
//! increment belong together they run in a single transaction.

pub mod analytics_repo;
pub mod catalog_repo;
pub mod category_repo;
pub mod engagement_repo;
pub mod prompt_repo;
pub mod purchase_repo;
pub mod review_repo;
pub mod tag_repo;
pub mod user_repo;

pub use analytics_repo::AnalyticsRepo;
pub use catalog_repo::CatalogRepo;
pub use category_repo::CategoryRepo;
pub use engagement_repo::EngagementRepo;
pub use prompt_repo::PromptRepo;
pub use purchase_repo::PurchaseRepo;
pub use review_repo::ReviewRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
