//! Application initialization and resource setup.
//!
//! This module provides functions to initialize all shared resources:
//! - Logger
//! - HTTP client for logo downloads
//! - Output directories
//! - The WebDriver browser session
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

use std::path::Path;

use crate::browser::WebDriverBrowser;
use crate::error_handling::InitializationError;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// Creates the output directory and its logos subdirectory.
///
/// # Errors
///
/// Returns `InitializationError::OutputDirError` if a directory cannot be created.
pub fn init_output_dirs(output_dir: &Path, logos_dir: &Path) -> Result<(), InitializationError> {
    std::fs::create_dir_all(output_dir)?;
    std::fs::create_dir_all(logos_dir)?;
    Ok(())
}

/// Opens the browser session used for the whole run.
///
/// # Errors
///
/// Returns `InitializationError::BrowserSessionError` when no WebDriver server
/// answers at `webdriver_url`.
pub async fn init_browser(
    webdriver_url: &str,
    headless: bool,
) -> Result<WebDriverBrowser, InitializationError> {
    WebDriverBrowser::connect(webdriver_url, headless).await
}
