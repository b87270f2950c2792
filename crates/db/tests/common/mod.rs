//! Shared seeding helpers for repository integration tests.
//!
//! Everything goes through the repository layer so tests exercise the
//! same paths production does; counters only move through the engagement
//! operations unless a test explicitly backdates or inflates rows with
//! raw SQL.

#![allow(dead_code)]

use promptmart_core::types::DbId;
use promptmart_db::models::category::{Category, CreateCategory};
use promptmart_db::models::prompt::{CreatePrompt, Prompt};
use promptmart_db::models::user::{CreateUser, User};
use promptmart_db::repositories::{CategoryRepo, PromptRepo, UserRepo};
use rust_decimal::Decimal;
use sqlx::PgPool;

pub async fn seed_user(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            is_creator: Some(true),
        },
    )
    .await
    .expect("failed to seed user")
}

pub async fn seed_category(pool: &PgPool, name: &str) -> Category {
    CategoryRepo::create(
        pool,
        &CreateCategory {
            name: name.to_string(),
            description: None,
        },
    )
    .await
    .expect("failed to seed category")
}

pub fn new_prompt(title: &str, category_id: DbId) -> CreatePrompt {
    CreatePrompt {
        title: title.to_string(),
        description: format!("{title} description"),
        content: format!("{title} content"),
        preview_content: None,
        category_id,
        price_type: None,
        price: None,
        difficulty_level: None,
        tag_ids: Vec::new(),
    }
}

pub fn new_paid_prompt(title: &str, category_id: DbId, price: Decimal) -> CreatePrompt {
    CreatePrompt {
        price_type: Some("paid".to_string()),
        price: Some(price),
        ..new_prompt(title, category_id)
    }
}

/// Create a prompt and publish it so the public catalog can see it.
pub async fn seed_published_prompt(
    pool: &PgPool,
    author_id: DbId,
    input: &CreatePrompt,
) -> Prompt {
    let prompt = PromptRepo::create(pool, author_id, input)
        .await
        .expect("failed to seed prompt");
    PromptRepo::publish(pool, prompt.id)
        .await
        .expect("failed to publish prompt")
        .expect("prompt vanished before publish")
}

/// Seed a draft prompt (never visible in the catalog).
pub async fn seed_draft_prompt(pool: &PgPool, author_id: DbId, input: &CreatePrompt) -> Prompt {
    PromptRepo::create(pool, author_id, input)
        .await
        .expect("failed to seed prompt")
}
