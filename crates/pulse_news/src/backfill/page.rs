use async_trait::async_trait;
use pulse_core::{Error, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use super::{jsonld, ContentBackfill};

/// Generic page-text extractor: no per-site selectors, no caching.
pub struct HtmlBackfill {
    client: Client,
}

impl HtmlBackfill {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentBackfill for HtmlBackfill {
    async fn extract_text(&self, url: &str) -> Result<String> {
        let url = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))?;

        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(Error::Scraping(format!("{} returned {}", url, response.status())));
        }
        let html = response.text().await?;

        Ok(extract_readable_text(&html))
    }
}

fn extract_texts(document: &Html, selector: &str) -> Result<Vec<String>> {
    let selector = Selector::parse(selector)
        .map_err(|e| Error::Scraping(format!("Invalid selector: {}", e)))?;

    Ok(document
        .select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect())
}

/// Main text of an HTML page: JSON-LD `articleBody` if present, else the
/// paragraphs inside `<article>`, else every paragraph on the page.
pub fn extract_readable_text(html: &str) -> String {
    let document = Html::parse_document(html);

    if let Some(body) = jsonld::extract_article_body(&document) {
        return body;
    }

    for selector in ["article p", "p"] {
        if let Ok(paragraphs) = extract_texts(&document, selector) {
            if !paragraphs.is_empty() {
                return paragraphs.join("\n\n");
            }
        }
    }

    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_article_paragraphs() {
        let html = r#"
            <html><body>
              <nav><p>Subscribe now</p></nav>
              <article>
                <p> First paragraph. </p>
                <p></p>
                <p>Second paragraph.</p>
              </article>
            </body></html>
        "#;
        assert_eq!(extract_readable_text(html), "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn test_falls_back_to_all_paragraphs() {
        let html = "<div><p>One</p></div><p>Two</p>";
        assert_eq!(extract_readable_text(html), "One\n\nTwo");
    }

    #[test]
    fn test_jsonld_wins() {
        let html = r#"
            <script type="application/ld+json">{"articleBody": "Structured body"}</script>
            <article><p>Paragraph</p></article>
        "#;
        assert_eq!(extract_readable_text(html), "Structured body");
    }

    #[test]
    fn test_empty_page() {
        assert_eq!(extract_readable_text("<html></html>"), "");
    }

    #[test]
    fn test_extract_texts_invalid_selector() {
        let document = Html::parse_document("<p>x</p>");
        assert!(extract_texts(&document, "[[").is_err());
    }

    #[tokio::test]
    async fn test_invalid_url_is_an_error() {
        let backfill = HtmlBackfill::new(Client::new());
        assert!(matches!(
            backfill.extract_text("").await,
            Err(Error::InvalidUrl(_))
        ));
    }
}
