//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod analytics;
pub mod catalog;
pub mod category;
pub mod engagement;
pub mod prompt;
pub mod purchase;
pub mod review;
pub mod tag;
pub mod user;
