//! HTTP handlers, one module per resource.

pub mod analytics;
pub mod catalog;
pub mod categories;
pub mod prompts;
pub mod purchases;
pub mod reviews;
pub mod tags;
