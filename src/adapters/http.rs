//! Shared blocking HTTP plumbing for the provider adapters.

use crate::domain::error::ProviderError;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub fn build_client(
    provider: &str,
    timeout_secs: u64,
) -> Result<reqwest::blocking::Client, ProviderError> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ProviderError::Network {
            provider: provider.to_string(),
            reason: format!("failed to build HTTP client: {e}"),
        })
}

/// Map a transport error onto the provider taxonomy.
pub fn classify(provider: &str, symbol: &str, err: &reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout {
            provider: provider.to_string(),
        }
    } else if err.is_decode() {
        ProviderError::malformed(provider, err.to_string())
    } else if let Some(status) = err.status() {
        ProviderError::from_status(provider, symbol, status.as_u16())
    } else {
        ProviderError::Network {
            provider: provider.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Turn a non-success status into an error, passing successful responses through.
pub fn check_status(
    provider: &str,
    symbol: &str,
    resp: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, ProviderError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        tracing::debug!(provider, symbol, status = status.as_u16(), "non-success response");
        Err(ProviderError::from_status(provider, symbol, status.as_u16()))
    }
}
