use std::sync::Arc;

use pulse_core::{Article, RawArticle, Result};
use tracing::{debug, info, warn};

use crate::backfill::{backfill, ContentBackfill, HtmlBackfill};
use crate::providers::{http_client, NewsSource, Provider, ProviderClient, ProviderKeys};

/// Multi-provider fetcher: the first provider that yields at least one usable
/// article wins, later providers are not queried.
pub struct NewsLoader {
    sources: Vec<Box<dyn NewsSource>>,
    backfill: Arc<dyn ContentBackfill>,
}

impl NewsLoader {
    /// `sources` must already be in priority order.
    pub fn new(sources: Vec<Box<dyn NewsSource>>, backfill: Arc<dyn ContentBackfill>) -> Self {
        Self { sources, backfill }
    }

    /// HTTP clients for every provider, in [`Provider::PRIORITY`] order.
    pub fn from_keys(keys: &ProviderKeys) -> Result<Self> {
        let client = http_client()?;
        let sources = Provider::PRIORITY
            .into_iter()
            .map(|provider| {
                let key = keys.key_for(provider).map(str::to_string);
                Box::new(ProviderClient::new(provider, key, client.clone())) as Box<dyn NewsSource>
            })
            .collect();
        Ok(Self::new(sources, Arc::new(HtmlBackfill::new(client))))
    }

    /// Each provider and whether it can be queried.
    pub fn providers(&self) -> Vec<(Provider, bool)> {
        self.sources
            .iter()
            .map(|s| (s.provider(), s.is_configured()))
            .collect()
    }

    pub async fn get_news(&self, topic: &str, max_results: usize) -> Vec<Article> {
        info!("🔎 Fetching news for: {}", topic);

        for source in &self.sources {
            let provider = source.provider();
            if !source.is_configured() {
                warn!(provider = %provider, "No API key configured, skipping");
                continue;
            }

            let articles = self.load_source(source.as_ref(), topic, max_results).await;
            if !articles.is_empty() {
                info!("✓ Got {} articles from {}", articles.len(), provider);
                return articles;
            }
            debug!(provider = %provider, "No usable articles, trying next provider");
        }

        warn!("✗ All news sources failed for {}", topic);
        Vec::new()
    }

    /// Queries one provider only, whatever its position in the priority order.
    pub async fn load_from(
        &self,
        provider: Provider,
        topic: &str,
        max_results: usize,
    ) -> Vec<Article> {
        match self.sources.iter().find(|s| s.provider() == provider) {
            Some(source) => self.load_source(source.as_ref(), topic, max_results).await,
            None => {
                warn!(provider = %provider, "Provider not registered");
                Vec::new()
            }
        }
    }

    async fn load_source(
        &self,
        source: &dyn NewsSource,
        topic: &str,
        max_results: usize,
    ) -> Vec<Article> {
        let raw_articles = match source.search(topic, max_results).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!(provider = %source.provider(), error = %e, "Provider failed");
                return Vec::new();
            }
        };

        let mut articles = Vec::with_capacity(raw_articles.len());
        for raw in raw_articles {
            if let Some(article) = self.normalize(raw).await {
                articles.push(article);
            }
        }
        articles
    }

    async fn normalize(&self, mut raw: RawArticle) -> Option<Article> {
        let text = std::mem::take(&mut raw.content);
        let content = backfill(self.backfill.as_ref(), text, &raw.url).await;
        let url = raw.url.clone();
        let article = Article::from_raw(raw, content);
        if article.is_none() {
            debug!(url = %url, "Dropping article with too little content");
        }
        article
    }
}
