use chrono::Utc;
use pulse_core::RawArticle;
use serde_json::Value;

const UNKNOWN_SOURCE: &str = "Unknown";

/// Where a provider keeps each article field in its JSON response.
#[derive(Debug, PartialEq, Eq)]
pub struct FieldMap {
    /// Top-level key holding the article array
    pub results: &'static str,
    pub title: &'static str,
    /// Tried in order; the first non-empty string wins
    pub content: &'static [&'static str],
    pub url: &'static str,
    /// Path into nested objects, e.g. `source.name`
    pub source: &'static [&'static str],
}

pub const NEWSDATA: FieldMap = FieldMap {
    results: "results",
    title: "title",
    content: &["content", "description"],
    url: "link",
    source: &["source_id"],
};

pub const GNEWS: FieldMap = FieldMap {
    results: "articles",
    title: "title",
    content: &["content", "description"],
    url: "url",
    source: &["source", "name"],
};

pub const THENEWSAPI: FieldMap = FieldMap {
    results: "data",
    title: "title",
    content: &["description"],
    url: "url",
    source: &["source"],
};

fn string_at<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn map_article(fields: &FieldMap, item: &Value) -> Option<RawArticle> {
    if !item.is_object() {
        return None;
    }

    let content = fields
        .content
        .iter()
        .filter_map(|key| string_at(item, key))
        .find(|text| !text.is_empty())
        .unwrap_or_default();

    let source = fields
        .source
        .iter()
        .try_fold(item, |value, key| value.get(*key))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_SOURCE);

    Some(RawArticle {
        title: string_at(item, fields.title).unwrap_or_default().to_string(),
        content: content.to_string(),
        url: string_at(item, fields.url).unwrap_or_default().to_string(),
        source: source.to_string(),
        fetched_at: Utc::now(),
    })
}

/// Maps a provider response body into raw articles, keeping at most
/// `max_results`. Errors when the body does not hold the expected array.
pub fn map_response(
    fields: &FieldMap,
    body: &Value,
    max_results: usize,
) -> std::result::Result<Vec<RawArticle>, String> {
    let items = body
        .get(fields.results)
        .and_then(Value::as_array)
        .ok_or_else(|| format!("response has no `{}` array", fields.results))?;

    Ok(items
        .iter()
        .filter_map(|item| map_article(fields, item))
        .take(max_results)
        .collect())
}
