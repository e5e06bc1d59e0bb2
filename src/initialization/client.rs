//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{DEFAULT_USER_AGENT, LOGO_FETCH_TIMEOUT_SECS};
use crate::error_handling::InitializationError;

/// Initializes the HTTP client used for logo downloads.
///
/// Creates a `reqwest::Client` configured with:
/// - A desktop browser User-Agent (the image host rejects unknown agents)
/// - The logo download timeout
/// - Default redirect following
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client() -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(LOGO_FETCH_TIMEOUT_SECS))
        .user_agent(DEFAULT_USER_AGENT)
        .build()?;
    Ok(Arc::new(client))
}
