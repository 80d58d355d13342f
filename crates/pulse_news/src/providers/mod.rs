use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use pulse_core::{Error, RawArticle, Result};

pub mod client;
pub mod mapping;

pub use client::{http_client, http_client_with_timeout, ProviderClient, REQUEST_TIMEOUT};
pub use mapping::{map_response, FieldMap};

/// The news search APIs, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    NewsData,
    GNews,
    TheNewsApi,
}

impl Provider {
    pub const PRIORITY: [Provider; 3] = [Provider::NewsData, Provider::GNews, Provider::TheNewsApi];

    pub fn name(&self) -> &'static str {
        match self {
            Provider::NewsData => "NewsData.io",
            Provider::GNews => "GNews",
            Provider::TheNewsApi => "TheNewsAPI",
        }
    }

    pub fn cli_name(&self) -> &'static str {
        match self {
            Provider::NewsData => "newsdata",
            Provider::GNews => "gnews",
            Provider::TheNewsApi => "thenewsapi",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Provider::NewsData => "📡",
            Provider::GNews => "📰",
            Provider::TheNewsApi => "🗞️",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::NewsData => "https://newsdata.io/api/1/news",
            Provider::GNews => "https://gnews.io/api/v4/search",
            Provider::TheNewsApi => "https://api.thenewsapi.com/v1/news/all",
        }
    }

    pub fn field_map(&self) -> &'static FieldMap {
        match self {
            Provider::NewsData => &mapping::NEWSDATA,
            Provider::GNews => &mapping::GNEWS,
            Provider::TheNewsApi => &mapping::THENEWSAPI,
        }
    }

    /// Query string for a search. NewsData takes no result count.
    pub fn query(
        &self,
        api_key: &str,
        topic: &str,
        max_results: usize,
    ) -> Vec<(&'static str, String)> {
        match self {
            Provider::NewsData => vec![
                ("apikey", api_key.to_string()),
                ("q", topic.to_string()),
                ("language", "en".to_string()),
            ],
            Provider::GNews => vec![
                ("q", topic.to_string()),
                ("lang", "en".to_string()),
                ("token", api_key.to_string()),
                ("max", max_results.to_string()),
            ],
            Provider::TheNewsApi => vec![
                ("api_token", api_key.to_string()),
                ("search", topic.to_string()),
                ("language", "en".to_string()),
                ("limit", max_results.to_string()),
            ],
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Provider::PRIORITY
            .into_iter()
            .find(|p| p.cli_name().eq_ignore_ascii_case(s) || p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Config(format!("Unknown provider: {}", s)))
    }
}

/// API keys, one per provider. A provider without a key is skipped.
#[derive(Clone, Default)]
pub struct ProviderKeys {
    pub newsdata: Option<String>,
    pub gnews: Option<String>,
    pub thenews: Option<String>,
}

impl ProviderKeys {
    pub fn key_for(&self, provider: Provider) -> Option<&str> {
        let key = match provider {
            Provider::NewsData => &self.newsdata,
            Provider::GNews => &self.gnews,
            Provider::TheNewsApi => &self.thenews,
        };
        key.as_deref().filter(|k| !k.is_empty())
    }
}

impl fmt::Debug for ProviderKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |p| self.key_for(p).map(|_| "<redacted>");
        f.debug_struct("ProviderKeys")
            .field("newsdata", &mask(Provider::NewsData))
            .field("gnews", &mask(Provider::GNews))
            .field("thenews", &mask(Provider::TheNewsApi))
            .finish()
    }
}

/// One news search backend.
#[async_trait]
pub trait NewsSource: Send + Sync {
    fn provider(&self) -> Provider;

    /// False when the source cannot possibly answer (e.g. no API key)
    fn is_configured(&self) -> bool {
        true
    }

    /// Search for `topic`, returning at most `max_results` raw articles
    async fn search(&self, topic: &str, max_results: usize) -> Result<Vec<RawArticle>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert_eq!(
            Provider::PRIORITY,
            [Provider::NewsData, Provider::GNews, Provider::TheNewsApi]
        );
    }

    #[test]
    fn test_parse_provider() {
        assert_eq!("gnews".parse::<Provider>().unwrap(), Provider::GNews);
        assert_eq!("NewsData.io".parse::<Provider>().unwrap(), Provider::NewsData);
        assert_eq!("TheNewsAPI".parse::<Provider>().unwrap(), Provider::TheNewsApi);
        assert!("newsapi".parse::<Provider>().is_err());
    }

    #[test]
    fn test_query_parameters() {
        let query = Provider::GNews.query("k", "science", 3);
        assert!(query.contains(&("max", "3".to_string())));
        assert!(query.contains(&("token", "k".to_string())));

        let query = Provider::NewsData.query("k", "science", 3);
        assert!(query.iter().all(|(name, _)| *name != "max" && *name != "size"));

        let query = Provider::TheNewsApi.query("k", "science", 3);
        assert!(query.contains(&("search", "science".to_string())));
        assert!(query.contains(&("limit", "3".to_string())));
    }

    #[test]
    fn test_empty_key_counts_as_missing() {
        let keys = ProviderKeys {
            newsdata: Some(String::new()),
            gnews: Some("abc".to_string()),
            thenews: None,
        };
        assert_eq!(keys.key_for(Provider::NewsData), None);
        assert_eq!(keys.key_for(Provider::GNews), Some("abc"));
        assert!(!format!("{:?}", keys).contains("abc"));
    }
}
