//! Error type definitions.
//!
//! This module defines the error types used throughout the application, one
//! enum per layer. Only the orchestrator turns them into run-level failures.

use std::time::Duration;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error opening the WebDriver session.
    #[error("Browser session initialization error: {0}")]
    BrowserSessionError(String),

    /// Error creating an output directory.
    #[error("Output directory initialization error: {0}")]
    OutputDirError(#[from] std::io::Error),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// An update addressed a row that does not exist.
    #[error("No {table} row with id {id}")]
    MissingRow {
        /// Table that was addressed
        table: &'static str,
        /// Surrogate id that was not found
        id: i64,
    },
}

/// Error types raised by a browser driver.
#[derive(Error, Debug)]
pub enum BrowserError {
    /// A WebDriver command failed (load error, stale element, lost session, ...).
    #[error("Browser command failed: {0}")]
    Command(String),

    /// A bounded wait ran out.
    #[error("Timed out after {0:?} waiting for {1}")]
    Timeout(Duration, String),

    /// A click target did not resolve to an element.
    #[error("No element for {0}")]
    ElementNotFound(String),

    /// The page served for a URL failed to load.
    #[error("Failed to load {0}")]
    LoadFailed(String),
}

impl From<fantoccini::error::CmdError> for BrowserError {
    fn from(e: fantoccini::error::CmdError) -> Self {
        BrowserError::Command(e.to_string())
    }
}

/// Error types for page navigation.
#[derive(Error, Debug)]
pub enum NavigationError {
    /// A relative link could not be resolved against the base origin.
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        /// The link as found on the page
        url: String,
        /// Parse failure
        #[source]
        source: url::ParseError,
    },

    /// Every attempt failed.
    #[error("Giving up on {url} after {attempts} attempt(s): {last}")]
    Exhausted {
        /// Absolute URL that was requested
        url: String,
        /// Number of attempts made
        attempts: usize,
        /// Failure of the final attempt
        last: BrowserError,
    },
}

/// Error types for one unit of scraping work (a category or an agency).
///
/// Raised by the listing traversal and the detail fetcher; the orchestrator
/// logs them and moves on to the next sibling.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The page could not be opened.
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// The browser failed mid-page.
    #[error(transparent)]
    Browser(#[from] BrowserError),

    /// The store rejected a write.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_error_message_names_url_and_attempts() {
        let err = NavigationError::Exhausted {
            url: "https://example.test/ab-7553".to_string(),
            attempts: 3,
            last: BrowserError::LoadFailed("https://example.test/ab-7553".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://example.test/ab-7553"));
        assert!(msg.contains("3 attempt"));
    }

    #[test]
    fn test_scrape_error_is_transparent() {
        let err = ScrapeError::from(DatabaseError::MissingRow {
            table: "agencies",
            id: 7,
        });
        assert_eq!(err.to_string(), "No agencies row with id 7");
    }

    #[test]
    fn test_timeout_message() {
        let err = BrowserError::Timeout(Duration::from_secs(3), "div.intro".to_string());
        assert!(err.to_string().contains("div.intro"));
    }
}
