//! Shared test helpers for storage module tests.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::storage::models::{NewAgency, NewCategory};
use crate::storage::Store;

/// Creates an in-memory pool.
///
/// Limited to one connection: every `sqlite::memory:` connection is its own
/// database.
pub async fn create_test_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool")
}

/// Creates a migrated in-memory store.
pub async fn create_test_store() -> Store {
    Store::with_pool(create_test_pool().await)
        .await
        .expect("Failed to run migrations")
}

pub fn new_category(name: &str, agency_count: i64) -> NewCategory {
    NewCategory {
        name: name.to_string(),
        link: format!("https://example.test/ab-7553?cat={name}"),
        agency_count,
    }
}

/// An agency with every listing field populated; `idx` drives the detail URL.
pub fn new_agency(category_id: i64, category_name: &str, name: &str, idx: Option<&str>) -> NewAgency {
    NewAgency {
        category_id,
        category_name: category_name.to_string(),
        name: name.to_string(),
        url: Some("https://alpha.example".to_string()),
        logo_url: Some("/img/logo.png".to_string()),
        local_logo_path: None,
        description: Some("소개".to_string()),
        idx: idx.map(str::to_string),
        detail_url: idx.map(|i| format!("https://example.test/ab-7554-{i}")),
    }
}
