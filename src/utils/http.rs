// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::ApiConfig;

/// Create the shared asynchronous HTTP client.
///
/// The timeout set here is the only one any request gets; the resolver never
/// overrides it per call.
pub fn create_async_client(config: &ApiConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}
