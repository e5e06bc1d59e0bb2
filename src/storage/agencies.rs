//! Agency persistence.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::error_handling::DatabaseError;
use crate::storage::models::{Agency, NewAgency, PendingDetail};
use crate::storage::Store;

const AGENCY_COLUMNS: &str = "id, category_id, category_name, agency_name, agency_url, \
     agency_logo, local_logo_path, agency_desc, agency_idx, agency_detail_url, \
     agency_detail_desc, detailed_scraped, last_updated";

fn agency_from_row(row: &SqliteRow) -> Result<Agency, sqlx::Error> {
    Ok(Agency {
        id: row.try_get("id")?,
        category_id: row.try_get("category_id")?,
        category_name: row.try_get("category_name")?,
        name: row.try_get("agency_name")?,
        url: row.try_get("agency_url")?,
        logo_url: row.try_get("agency_logo")?,
        local_logo_path: row.try_get("local_logo_path")?,
        description: row.try_get("agency_desc")?,
        idx: row.try_get("agency_idx")?,
        detail_url: row.try_get("agency_detail_url")?,
        detail_description: row.try_get("agency_detail_desc")?,
        detailed_scraped: row.try_get("detailed_scraped")?,
        last_updated: row.try_get("last_updated")?,
    })
}

impl Store {
    /// Inserts an agency or merges it into the row with the same
    /// `(category_id, name)`.
    ///
    /// Fields passed as `None` keep whatever the row already holds; fields
    /// passed as `Some` overwrite. Detail columns are never touched here.
    pub async fn upsert_agency(&self, agency: &NewAgency) -> Result<i64, DatabaseError> {
        let _guard = self.serialize().await;
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO agencies (
                 category_id, category_name, agency_name, agency_url, agency_logo,
                 local_logo_path, agency_desc, agency_idx, agency_detail_url, last_updated
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(category_id, agency_name) DO UPDATE SET
                 category_name = excluded.category_name,
                 agency_url = COALESCE(excluded.agency_url, agencies.agency_url),
                 agency_logo = COALESCE(excluded.agency_logo, agencies.agency_logo),
                 local_logo_path = COALESCE(excluded.local_logo_path, agencies.local_logo_path),
                 agency_desc = COALESCE(excluded.agency_desc, agencies.agency_desc),
                 agency_idx = COALESCE(excluded.agency_idx, agencies.agency_idx),
                 agency_detail_url = COALESCE(excluded.agency_detail_url, agencies.agency_detail_url),
                 last_updated = CURRENT_TIMESTAMP
             RETURNING id",
        )
        .bind(agency.category_id)
        .bind(&agency.category_name)
        .bind(&agency.name)
        .bind(&agency.url)
        .bind(&agency.logo_url)
        .bind(&agency.local_logo_path)
        .bind(&agency.description)
        .bind(&agency.idx)
        .bind(&agency.detail_url)
        .fetch_one(self.pool())
        .await?;
        Ok(id)
    }

    /// Stores the long-form description and flags the agency as detailed.
    ///
    /// Both columns change in the one statement.
    pub async fn record_agency_detail(
        &self,
        agency_id: i64,
        description: &str,
    ) -> Result<(), DatabaseError> {
        let _guard = self.serialize().await;
        let result = sqlx::query(
            "UPDATE agencies
             SET agency_detail_desc = ?, detailed_scraped = 1, last_updated = CURRENT_TIMESTAMP
             WHERE id = ?",
        )
        .bind(description)
        .bind(agency_id)
        .execute(self.pool())
        .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::MissingRow {
                table: "agencies",
                id: agency_id,
            });
        }
        Ok(())
    }

    /// Agencies still waiting for a detail fetch, in id order.
    ///
    /// Rows without a detail URL are never returned: there is nothing to fetch.
    pub async fn agencies_pending_detail(&self) -> Result<Vec<PendingDetail>, DatabaseError> {
        let _guard = self.serialize().await;
        let rows = sqlx::query(
            "SELECT id, agency_name, agency_idx, agency_detail_url FROM agencies
             WHERE detailed_scraped = 0 AND agency_detail_url IS NOT NULL
             ORDER BY id",
        )
        .fetch_all(self.pool())
        .await?;
        let pending = rows
            .iter()
            .map(|row| -> Result<PendingDetail, sqlx::Error> {
                Ok(PendingDetail {
                    id: row.try_get("id")?,
                    name: row.try_get("agency_name")?,
                    idx: row.try_get("agency_idx")?,
                    detail_url: row.try_get("agency_detail_url")?,
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(pending)
    }

    /// Agencies of one category, in insertion order.
    pub async fn agencies_by_category(&self, category_id: i64) -> Result<Vec<Agency>, DatabaseError> {
        let _guard = self.serialize().await;
        let rows = sqlx::query(&format!(
            "SELECT {AGENCY_COLUMNS} FROM agencies WHERE category_id = ? ORDER BY id"
        ))
        .bind(category_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.iter().map(agency_from_row).collect::<Result<_, _>>()?)
    }

    pub async fn agency_by_id(&self, agency_id: i64) -> Result<Option<Agency>, DatabaseError> {
        let _guard = self.serialize().await;
        let row = sqlx::query(&format!("SELECT {AGENCY_COLUMNS} FROM agencies WHERE id = ?"))
            .bind(agency_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.as_ref().map(agency_from_row).transpose()?)
    }

    /// Every agency, in id order.
    pub async fn all_agencies(&self) -> Result<Vec<Agency>, DatabaseError> {
        let _guard = self.serialize().await;
        let rows = sqlx::query(&format!("SELECT {AGENCY_COLUMNS} FROM agencies ORDER BY id"))
            .fetch_all(self.pool())
            .await?;
        Ok(rows.iter().map(agency_from_row).collect::<Result<_, _>>()?)
    }

    pub async fn count_agencies(&self) -> Result<i64, DatabaseError> {
        let _guard = self.serialize().await;
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM agencies")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    /// Number of agencies whose detail page has been recorded.
    pub async fn count_agencies_with_details(&self) -> Result<i64, DatabaseError> {
        let _guard = self.serialize().await;
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM agencies WHERE detailed_scraped = 1",
        )
        .fetch_one(self.pool())
        .await?;
        Ok(count)
    }
}
