//! Row types for the store.
//!
//! `New*` types are what the scraper hands to an upsert; the others are what the
//! store reads back. None of them are shared between tasks.

use strum_macros::{Display, EnumString};

/// A category as found on the directory page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// Display name; the natural key
    pub name: String,
    /// Absolute listing URL
    pub link: String,
    /// Agency count printed next to the name. Advisory only.
    pub agency_count: i64,
}

/// A persisted category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Surrogate id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Absolute listing URL
    pub link: String,
    /// Advisory agency count
    pub agency_count: i64,
    /// Set once the full paginated listing has been walked
    pub scraped: bool,
    /// `CURRENT_TIMESTAMP` of the last write
    pub last_updated: String,
}

/// An agency as extracted from a listing page.
///
/// `None` fields are left untouched on upsert; sentinel strings overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAgency {
    pub category_id: i64,
    pub category_name: String,
    pub name: String,
    pub url: Option<String>,
    pub logo_url: Option<String>,
    pub local_logo_path: Option<String>,
    pub description: Option<String>,
    pub idx: Option<String>,
    pub detail_url: Option<String>,
}

/// A persisted agency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agency {
    pub id: i64,
    pub category_id: i64,
    pub category_name: String,
    pub name: String,
    pub url: Option<String>,
    pub logo_url: Option<String>,
    pub local_logo_path: Option<String>,
    pub description: Option<String>,
    pub idx: Option<String>,
    pub detail_url: Option<String>,
    /// Long-form description from the detail page
    pub detail_description: Option<String>,
    /// True only together with a non-null `detail_description`
    pub detailed_scraped: bool,
    pub last_updated: String,
}

/// An agency that still needs its detail page fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDetail {
    pub id: i64,
    pub name: String,
    pub idx: Option<String>,
    pub detail_url: String,
}

/// Lifecycle of a scraping session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SessionStatus {
    /// Created at start, until a terminal transition
    Running,
    /// Every step finished
    Completed,
    /// A fatal fault or an interruption ended the run
    Failed,
}

impl SessionStatus {
    /// Whether the status ends the session (sets its end time).
    pub fn is_terminal(self) -> bool {
        !matches!(self, SessionStatus::Running)
    }
}

/// Progress of one run, passed explicitly through the traversal.
///
/// Every increment is followed by a `Store::update_session_counters` call, so
/// the `scraping_status` row always reflects the last finished unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub id: i64,
    pub started_at: String,
    pub ended_at: Option<String>,
    pub categories_total: i64,
    pub categories_scraped: i64,
    pub agencies_total: i64,
    pub agencies_scraped: i64,
    pub details_total: i64,
    pub details_scraped: i64,
    pub status: SessionStatus,
}
