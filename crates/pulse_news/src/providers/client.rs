use std::time::Duration;

use async_trait::async_trait;
use pulse_core::{Error, RawArticle, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{map_response, NewsSource, Provider};

/// Socket timeout for every provider and page request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("pulse-ai/", env!("CARGO_PKG_VERSION"));

/// The shared HTTP client for provider searches and page backfill.
pub fn http_client() -> Result<Client> {
    http_client_with_timeout(REQUEST_TIMEOUT)
}

pub fn http_client_with_timeout(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).user_agent(USER_AGENT).build()?)
}

/// Issues one search request against a single provider.
pub struct ProviderClient {
    provider: Provider,
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl ProviderClient {
    pub fn new(provider: Provider, api_key: Option<String>, client: Client) -> Self {
        Self {
            provider,
            client,
            api_key: api_key.filter(|k| !k.is_empty()),
            base_url: provider.default_base_url().to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl NewsSource for ProviderClient {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, topic: &str, max_results: usize) -> Result<Vec<RawArticle>> {
        let fail = |reason: String| Error::provider(self.provider, reason);
        let api_key = self.api_key.as_deref().unwrap_or_default();

        let response = self
            .client
            .get(&self.base_url)
            .query(&self.provider.query(api_key, topic, max_results))
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fail(format!("status {}", status)));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| fail(format!("malformed response: {}", e)))?;

        let articles = map_response(self.provider.field_map(), &body, max_results).map_err(fail)?;
        debug!(provider = %self.provider, count = articles.len(), "Provider search finished");
        Ok(articles)
    }
}
