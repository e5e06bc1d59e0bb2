//! Scraping-session bookkeeping (`scraping_status` table).

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;

use crate::error_handling::DatabaseError;
use crate::storage::models::{SessionState, SessionStatus};
use crate::storage::Store;

fn session_from_row(row: &SqliteRow) -> Result<SessionState, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let status = SessionStatus::from_str(&status).map_err(|e| sqlx::Error::ColumnDecode {
        index: "status".to_string(),
        source: Box::new(e),
    })?;
    Ok(SessionState {
        id: row.try_get("id")?,
        started_at: row.try_get("session_start")?,
        ended_at: row.try_get("session_end")?,
        categories_total: row.try_get("categories_total")?,
        categories_scraped: row.try_get("categories_scraped")?,
        agencies_total: row.try_get("agencies_total")?,
        agencies_scraped: row.try_get("agencies_scraped")?,
        details_total: row.try_get("details_total")?,
        details_scraped: row.try_get("details_scraped")?,
        status,
    })
}

impl Store {
    /// Opens a new `running` session with zeroed counters.
    pub async fn create_session(&self) -> Result<SessionState, DatabaseError> {
        let _guard = self.serialize().await;
        let row = sqlx::query(
            "INSERT INTO scraping_status (session_start, status)
             VALUES (CURRENT_TIMESTAMP, ?)
             RETURNING id, session_start",
        )
        .bind(SessionStatus::Running.to_string())
        .fetch_one(self.pool())
        .await?;
        Ok(SessionState {
            id: row.try_get("id")?,
            started_at: row.try_get("session_start")?,
            ended_at: None,
            categories_total: 0,
            categories_scraped: 0,
            agencies_total: 0,
            agencies_scraped: 0,
            details_total: 0,
            details_scraped: 0,
            status: SessionStatus::Running,
        })
    }

    /// Writes all six counters of `session` to its row.
    pub async fn update_session_counters(&self, session: &SessionState) -> Result<(), DatabaseError> {
        let _guard = self.serialize().await;
        let result = sqlx::query(
            "UPDATE scraping_status SET
                 categories_total = ?, categories_scraped = ?,
                 agencies_total = ?, agencies_scraped = ?,
                 details_total = ?, details_scraped = ?
             WHERE id = ?",
        )
        .bind(session.categories_total)
        .bind(session.categories_scraped)
        .bind(session.agencies_total)
        .bind(session.agencies_scraped)
        .bind(session.details_total)
        .bind(session.details_scraped)
        .bind(session.id)
        .execute(self.pool())
        .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::MissingRow {
                table: "scraping_status",
                id: session.id,
            });
        }
        Ok(())
    }

    /// Moves the session to `status`, flushing counters in the same statement.
    ///
    /// A terminal status also stamps the end time, which is copied back into
    /// `session`.
    pub async fn finish_session(
        &self,
        session: &mut SessionState,
        status: SessionStatus,
    ) -> Result<(), DatabaseError> {
        let _guard = self.serialize().await;
        let row = sqlx::query(
            "UPDATE scraping_status SET
                 categories_total = ?, categories_scraped = ?,
                 agencies_total = ?, agencies_scraped = ?,
                 details_total = ?, details_scraped = ?,
                 status = ?,
                 session_end = CASE WHEN ? THEN CURRENT_TIMESTAMP ELSE session_end END
             WHERE id = ?
             RETURNING session_end",
        )
        .bind(session.categories_total)
        .bind(session.categories_scraped)
        .bind(session.agencies_total)
        .bind(session.agencies_scraped)
        .bind(session.details_total)
        .bind(session.details_scraped)
        .bind(status.to_string())
        .bind(status.is_terminal())
        .bind(session.id)
        .fetch_optional(self.pool())
        .await?;
        let row = row.ok_or(DatabaseError::MissingRow {
            table: "scraping_status",
            id: session.id,
        })?;
        session.ended_at = row.try_get("session_end")?;
        session.status = status;
        Ok(())
    }

    /// Every recorded session, oldest first.
    pub async fn sessions(&self) -> Result<Vec<SessionState>, DatabaseError> {
        let _guard = self.serialize().await;
        let rows = sqlx::query(
            "SELECT id, session_start, session_end, categories_total, categories_scraped,
                    agencies_total, agencies_scraped, details_total, details_scraped, status
             FROM scraping_status ORDER BY id",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(rows.iter().map(session_from_row).collect::<Result<_, _>>()?)
    }
}
