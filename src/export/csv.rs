//! CSV export functionality.
//!
//! Writes the three tables of the store to `categories.csv`, `agencies.csv`
//! and `scraping_status.csv`, one row per stored row, with the store's column
//! names as headers.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use crate::config::{AGENCIES_CSV, CATEGORIES_CSV, SESSIONS_CSV};
use crate::storage::Store;

/// UTF-8 byte-order mark; spreadsheet tools need it to read Korean text correctly.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Rows written per file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub categories: usize,
    pub agencies: usize,
    pub sessions: usize,
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Creates `path`, writes the BOM and returns a CSV writer over it.
fn create_writer(path: &Path) -> Result<Writer<File>> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    file.write_all(UTF8_BOM)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(Writer::from_writer(file))
}

/// Exports every table of `store` into `output_dir`.
///
/// Files are overwritten. Each gets a header row even when its table is empty.
///
/// # Returns
///
/// The number of data rows written per file.
pub async fn export_csv(store: &Store, output_dir: &Path) -> Result<ExportSummary> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    let mut summary = ExportSummary::default();

    let categories = store.all_categories().await?;
    let mut writer = create_writer(&output_dir.join(CATEGORIES_CSV))?;
    writer.write_record([
        "id",
        "category_name",
        "category_link",
        "agency_count",
        "scraped",
        "last_updated",
    ])?;
    for c in &categories {
        writer.write_record([
            c.id.to_string(),
            c.name.clone(),
            c.link.clone(),
            c.agency_count.to_string(),
            flag(c.scraped),
            c.last_updated.clone(),
        ])?;
    }
    writer.flush()?;
    summary.categories = categories.len();

    let agencies = store.all_agencies().await?;
    let mut writer = create_writer(&output_dir.join(AGENCIES_CSV))?;
    writer.write_record([
        "id",
        "category_id",
        "category_name",
        "agency_name",
        "agency_url",
        "agency_logo",
        "local_logo_path",
        "agency_desc",
        "agency_idx",
        "agency_detail_url",
        "agency_detail_desc",
        "detailed_scraped",
        "last_updated",
    ])?;
    for a in &agencies {
        writer.write_record([
            a.id.to_string(),
            a.category_id.to_string(),
            a.category_name.clone(),
            a.name.clone(),
            opt(&a.url),
            opt(&a.logo_url),
            opt(&a.local_logo_path),
            opt(&a.description),
            opt(&a.idx),
            opt(&a.detail_url),
            opt(&a.detail_description),
            flag(a.detailed_scraped),
            a.last_updated.clone(),
        ])?;
    }
    writer.flush()?;
    summary.agencies = agencies.len();

    let sessions = store.sessions().await?;
    let mut writer = create_writer(&output_dir.join(SESSIONS_CSV))?;
    writer.write_record([
        "id",
        "session_start",
        "session_end",
        "categories_total",
        "categories_scraped",
        "agencies_total",
        "agencies_scraped",
        "details_total",
        "details_scraped",
        "status",
    ])?;
    for s in &sessions {
        writer.write_record([
            s.id.to_string(),
            s.started_at.clone(),
            opt(&s.ended_at),
            s.categories_total.to_string(),
            s.categories_scraped.to_string(),
            s.agencies_total.to_string(),
            s.agencies_scraped.to_string(),
            s.details_total.to_string(),
            s.details_scraped.to_string(),
            s.status.to_string(),
        ])?;
    }
    writer.flush()?;
    summary.sessions = sessions.len();

    log::info!(
        "Exported {} categories, {} agencies and {} sessions to {}",
        summary.categories,
        summary.agencies,
        summary.sessions,
        output_dir.display()
    );
    Ok(summary)
}
