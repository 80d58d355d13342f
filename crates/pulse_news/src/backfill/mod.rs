use async_trait::async_trait;
use pulse_core::{meets_min_content, Result};
use tracing::debug;

pub mod jsonld;
pub mod page;

pub use page::{extract_readable_text, HtmlBackfill};

/// Fetches the readable text of an article page.
#[async_trait]
pub trait ContentBackfill: Send + Sync {
    async fn extract_text(&self, url: &str) -> Result<String>;
}

/// Returns `text` unchanged when it is long enough, otherwise whatever the
/// page at `url` yields. Errors become an empty string so the length check
/// downstream drops the article.
pub async fn backfill(extractor: &dyn ContentBackfill, text: String, url: &str) -> String {
    if meets_min_content(&text) {
        return text;
    }
    match extractor.extract_text(url).await {
        Ok(page_text) => page_text,
        Err(e) => {
            debug!(url, error = %e, "Scraping failed");
            String::new()
        }
    }
}
