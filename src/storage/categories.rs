//! Category persistence.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::error_handling::DatabaseError;
use crate::storage::models::{Category, NewCategory};
use crate::storage::Store;

const CATEGORY_COLUMNS: &str =
    "id, category_name, category_link, agency_count, scraped, last_updated";

fn category_from_row(row: &SqliteRow) -> Result<Category, sqlx::Error> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("category_name")?,
        link: row.try_get("category_link")?,
        agency_count: row.try_get("agency_count")?,
        scraped: row.try_get("scraped")?,
        last_updated: row.try_get("last_updated")?,
    })
}

impl Store {
    /// Inserts a category or refreshes the existing row with the same name.
    ///
    /// The link and advisory count are overwritten and the timestamp refreshed;
    /// the `scraped` flag is never touched, so a re-discovery keeps finished
    /// categories finished.
    ///
    /// # Returns
    ///
    /// The surrogate id of the inserted or existing row.
    pub async fn upsert_category(&self, category: &NewCategory) -> Result<i64, DatabaseError> {
        let _guard = self.serialize().await;
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO categories (category_name, category_link, agency_count, last_updated)
             VALUES (?, ?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(category_name) DO UPDATE SET
                 category_link = excluded.category_link,
                 agency_count = excluded.agency_count,
                 last_updated = CURRENT_TIMESTAMP
             RETURNING id",
        )
        .bind(&category.name)
        .bind(&category.link)
        .bind(category.agency_count)
        .fetch_one(self.pool())
        .await?;
        Ok(id)
    }

    /// Flags a category as fully traversed.
    pub async fn mark_category_scraped(&self, category_id: i64) -> Result<(), DatabaseError> {
        let _guard = self.serialize().await;
        let result = sqlx::query(
            "UPDATE categories SET scraped = 1, last_updated = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(category_id)
        .execute(self.pool())
        .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::MissingRow {
                table: "categories",
                id: category_id,
            });
        }
        Ok(())
    }

    /// Categories whose listing has not been fully traversed yet, in id order.
    pub async fn categories_pending_scrape(&self) -> Result<Vec<Category>, DatabaseError> {
        let _guard = self.serialize().await;
        let rows = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE scraped = 0 ORDER BY id"
        ))
        .fetch_all(self.pool())
        .await?;
        Ok(rows
            .iter()
            .map(category_from_row)
            .collect::<Result<_, _>>()?)
    }

    /// Every category, in id order.
    pub async fn all_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let _guard = self.serialize().await;
        let rows = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id"
        ))
        .fetch_all(self.pool())
        .await?;
        Ok(rows
            .iter()
            .map(category_from_row)
            .collect::<Result<_, _>>()?)
    }

    /// Number of persisted categories.
    pub async fn count_categories(&self) -> Result<i64, DatabaseError> {
        let _guard = self.serialize().await;
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }
}
