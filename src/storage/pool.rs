//! Database connection pool management.
//!
//! This module initializes and configures the SQLite connection pool with:
//! - WAL mode enabled
//! - Automatic database file creation

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;

use log::{error, info};
use sqlx::SqlitePool;

use crate::error_handling::DatabaseError;

/// Initializes and returns a database connection pool for the given path.
///
/// Creates the database file (and its parent directory) if it doesn't exist and
/// enables WAL mode. An existing file is reused as-is; that is what lets a new
/// run pick up where an earlier one stopped.
pub async fn init_db_pool_with_path(db_path: &Path) -> Result<SqlitePool, DatabaseError> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            error!("Failed to create database directory {}: {e}", parent.display());
            DatabaseError::FileCreationError(e.to_string())
        })?;
    }

    let db_path_str = db_path.to_string_lossy().to_string();
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(&db_path_str)
    {
        Ok(_) => info!("Database file created at {}.", db_path_str),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            info!("Reusing existing database at {}.", db_path_str)
        }
        Err(e) => {
            error!("Failed to create database file: {e}");
            return Err(DatabaseError::FileCreationError(e.to_string()));
        }
    }

    let pool = SqlitePool::connect(&format!("sqlite:{}", db_path_str))
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {e}");
            DatabaseError::SqlError(e)
        })?;

    // Enable WAL mode
    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await
        .map_err(|e| {
            error!("Failed to set WAL mode: {e}");
            DatabaseError::SqlError(e)
        })?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_creates_missing_file_and_parent() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("store.db");
        let pool = init_db_pool_with_path(&path).await.expect("pool");
        assert!(path.exists());
        pool.close().await;
    }

    #[tokio::test]
    async fn test_reuses_existing_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("store.db");
        let first = init_db_pool_with_path(&path).await.expect("first pool");
        sqlx::query("CREATE TABLE marker (id INTEGER)")
            .execute(&first)
            .await
            .expect("create marker");
        first.close().await;

        let second = init_db_pool_with_path(&path).await.expect("second pool");
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='marker'",
        )
        .fetch_one(&second)
        .await
        .expect("query");
        assert_eq!(count, 1);
        second.close().await;
    }
}
