//! Session finalization.
//!
//! This module contains the `finalize_session` function, which records the
//! session's terminal status, releases the run's resources and builds the
//! report.

use std::path::Path;
use std::time::Instant;

use log::{error, info, warn};

use crate::export::{export_csv, ExportSummary};
use crate::storage::{SessionState, SessionStatus};

use super::{ScrapeReport, ScrapeResources};

/// How the session sequence ended.
pub(crate) enum SessionEnd {
    Completed(ExportSummary),
    Failed(anyhow::Error),
    Interrupted,
}

/// Finalize a run and produce its report.
///
/// 1. Mark the session `completed` or `failed` (the end time is set either way)
/// 2. For a completed session, export again so `scraping_status.csv` carries
///    the final status and end time
/// 3. Close the browser session and the store
/// 4. Build the report
pub(crate) async fn finalize_session(
    resources: ScrapeResources,
    mut session: SessionState,
    end: SessionEnd,
    start_time: Instant,
    output_dir: &Path,
) -> ScrapeReport {
    let (status, mut export, failure) = match end {
        SessionEnd::Completed(summary) => (SessionStatus::Completed, Some(summary), None),
        SessionEnd::Failed(e) => {
            error!("Scraping failed: {e:#}");
            (SessionStatus::Failed, None, Some(format!("{e:#}")))
        }
        SessionEnd::Interrupted => {
            warn!("Interrupted; marking session {} failed", session.id);
            (SessionStatus::Failed, None, Some("interrupted".to_string()))
        }
    };

    match resources.store.finish_session(&mut session, status).await {
        Ok(()) if export.is_some() => match export_csv(&resources.store, output_dir).await {
            Ok(summary) => export = Some(summary),
            Err(e) => warn!(
                "Could not refresh CSV export after session {} ended: {e:#}",
                session.id
            ),
        },
        Ok(()) => {}
        Err(e) => {
            error!("Failed to record end of session {}: {e}", session.id);
            session.status = status;
        }
    }
    resources.release().await;

    let elapsed_seconds = start_time.elapsed().as_secs_f64();
    info!(
        "Session {} {}: {}/{} categories, {}/{} agencies, {}/{} details in {:.1}s",
        session.id,
        session.status,
        session.categories_scraped,
        session.categories_total,
        session.agencies_scraped,
        session.agencies_total,
        session.details_scraped,
        session.details_total,
        elapsed_seconds
    );

    ScrapeReport {
        session,
        export,
        failure,
        elapsed_seconds,
    }
}
