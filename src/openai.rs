//! Client setup for OpenAI-compatible embedding and generation services.

use crate::config::ProviderSettings;
use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create a client for the configured provider.
///
/// The request timeout lives here, in the HTTP client; pipeline components do not add their own.
pub fn create_client(provider: &ProviderSettings) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(provider.timeout_secs))
        .build()?;

    let config = OpenAIConfig::new()
        .with_api_base(provider.api_base.trim_end_matches('/'))
        .with_api_key(provider.resolved_api_key());

    Ok(Client::with_config(config).with_http_client(http_client))
}
