//! The `Store` handle.

use std::path::Path;
use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::{Mutex, MutexGuard};

use crate::error_handling::DatabaseError;
use crate::storage::{init_db_pool_with_path, run_migrations};

/// Handle to the SQLite store.
///
/// Cloning is cheap; clones share the pool and the lock. Every operation takes
/// the lock first, so at most one statement sequence is in flight at a time.
#[derive(Clone, Debug)]
pub struct Store {
    pool: SqlitePool,
    lock: Arc<Mutex<()>>,
}

impl Store {
    /// Opens (or creates) the database file and applies migrations.
    pub async fn open(db_path: &Path) -> Result<Self, DatabaseError> {
        let pool = init_db_pool_with_path(db_path).await?;
        Self::with_pool(pool).await
    }

    /// Wraps an existing pool and applies migrations.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, DatabaseError> {
        run_migrations(&pool).await?;
        Ok(Self {
            pool,
            lock: Arc::new(Mutex::new(())),
        })
    }

    /// Underlying pool, for read-only reporting queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the pool once in-flight work has released the lock.
    pub async fn close(&self) {
        let _guard = self.lock.lock().await;
        self.pool.close().await;
        log::info!("Database connection closed.");
    }

    pub(crate) async fn serialize(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}
