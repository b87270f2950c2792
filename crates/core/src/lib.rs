//! Pure domain logic for the PromptMart catalog & engagement subsystem.
//!
//! This crate has no database dependency: shared id/timestamp aliases, the
//! domain error taxonomy, the engagement scorer, slug derivation, and the
//! catalog filter/sort vocabulary live here so the repository and API layers
//! can share them.

pub mod catalog;
pub mod engagement;
pub mod error;
pub mod slug;
pub mod types;
