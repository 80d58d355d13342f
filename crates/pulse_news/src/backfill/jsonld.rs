use scraper::{Html, Selector};
use serde_json::Value;

fn find_article_body(json: &Value) -> Option<String> {
    match json {
        Value::Array(items) => items.iter().find_map(find_article_body),
        Value::Object(obj) => {
            if let Some(body) = obj.get("articleBody").and_then(|b| b.as_str()) {
                let body = body.trim();
                if !body.is_empty() {
                    return Some(body.to_string());
                }
            }
            obj.get("@graph").and_then(find_article_body)
        }
        _ => None,
    }
}

/// Extracts `articleBody` from JSON-LD metadata in the HTML document.
pub fn extract_article_body(document: &Html) -> Option<String> {
    let script_selector = Selector::parse("script[type='application/ld+json']").ok()?;

    document.select(&script_selector).find_map(|script| {
        serde_json::from_str::<Value>(script.text().collect::<String>().trim())
            .ok()
            .and_then(|json| find_article_body(&json))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_body_from_graph() {
        let html = r#"
            <script type="application/ld+json">{"@type": "Organization", "name": "x"}</script>
            <script type="application/ld+json">
              {"@graph": [
                {"@type": "WebPage"},
                {"@type": "NewsArticle", "articleBody": "  The body.  "}
              ]}
            </script>
        "#;
        let document = Html::parse_document(html);
        assert_eq!(extract_article_body(&document).as_deref(), Some("The body."));
    }

    #[test]
    fn test_invalid_json_is_skipped() {
        let html = r#"
            <script type="application/ld+json">{not json</script>
            <script type="application/ld+json">[{"articleBody": "From array"}]</script>
        "#;
        let document = Html::parse_document(html);
        assert_eq!(extract_article_body(&document).as_deref(), Some("From array"));
    }

    #[test]
    fn test_missing_body() {
        let document = Html::parse_document("<p>No metadata</p>");
        assert!(extract_article_body(&document).is_none());
    }
}
