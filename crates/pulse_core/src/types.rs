use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Articles whose body text stays below this many characters after backfill
/// are dropped before processing.
pub const MIN_CONTENT_CHARS: usize = 380;

/// How long a persisted record stays visible before the store expires it.
pub const RETENTION: Duration = Duration::from_secs(2 * 24 * 60 * 60);

/// Upper bound on records returned for a topic query.
pub const RECENT_LIMIT: usize = 10;

pub const DEFAULT_TOPIC: &str = "technology";

/// URL prefix under which generated audio files are served.
pub const AUDIO_ROUTE: &str = "/static/audio";

/// Length in characters (Unicode scalar values), not bytes.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

pub fn meets_min_content(text: &str) -> bool {
    char_len(text) >= MIN_CONTENT_CHARS
}

/// Returns the first `max_chars` characters of `text` without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// An article as returned by a provider, before backfill and filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawArticle {
    pub title: String,
    pub content: String,
    pub url: String,
    pub source: String,
    pub fetched_at: DateTime<Utc>,
}

/// An article that passed normalization. `content` always satisfies
/// [`MIN_CONTENT_CHARS`]; use [`Article::from_raw`] to build one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub content: String,
    pub url: String,
    pub source: String,
    pub normalized_at: DateTime<Utc>,
}

impl Article {
    /// Builds a normalized article from `raw` with the (possibly backfilled)
    /// `content`, or `None` if the content is still too short.
    pub fn from_raw(raw: RawArticle, content: String) -> Option<Self> {
        if !meets_min_content(&content) {
            return None;
        }
        Some(Self {
            title: raw.title,
            content,
            url: raw.url,
            source: raw.source,
            normalized_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryTier {
    Short,
    Medium,
    Full,
}

impl SummaryTier {
    pub const ALL: [SummaryTier; 3] = [SummaryTier::Short, SummaryTier::Medium, SummaryTier::Full];

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryTier::Short => "short",
            SummaryTier::Medium => "medium",
            SummaryTier::Full => "full",
        }
    }

    /// Minimum and maximum summary length in model tokens.
    pub fn length_bounds(&self) -> (u32, u32) {
        match self {
            SummaryTier::Short => (20, 50),
            SummaryTier::Medium => (80, 150),
            SummaryTier::Full => (150, 300),
        }
    }

    /// Characters of raw content kept when the model cannot summarize.
    pub fn fallback_chars(&self) -> usize {
        match self {
            SummaryTier::Short | SummaryTier::Medium => 200,
            SummaryTier::Full => 500,
        }
    }
}

impl fmt::Display for SummaryTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per summary tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tiered<T> {
    pub short: T,
    pub medium: T,
    pub full: T,
}

impl<T> Tiered<T> {
    pub fn get(&self, tier: SummaryTier) -> &T {
        match tier {
            SummaryTier::Short => &self.short,
            SummaryTier::Medium => &self.medium,
            SummaryTier::Full => &self.full,
        }
    }

    pub fn get_mut(&mut self, tier: SummaryTier) -> &mut T {
        match tier {
            SummaryTier::Short => &mut self.short,
            SummaryTier::Medium => &mut self.medium,
            SummaryTier::Full => &mut self.full,
        }
    }
}

/// Persisted, served as-is by `/get_news`. Field names are the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsRecord {
    pub topic: String,
    pub date: String,
    pub title: String,
    pub summary_short: String,
    pub summary_medium: String,
    pub summary_full: String,
    pub audio_short: Option<String>,
    pub audio_medium: Option<String>,
    pub audio_full: Option<String>,
    pub url: String,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

impl NewsRecord {
    pub fn new(
        topic: &str,
        article: &Article,
        summaries: Tiered<String>,
        audio: Tiered<Option<String>>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            topic: topic.to_string(),
            date: timestamp.format("%Y-%m-%d").to_string(),
            title: article.title.clone(),
            summary_short: summaries.short,
            summary_medium: summaries.medium,
            summary_full: summaries.full,
            audio_short: audio.short,
            audio_medium: audio.medium,
            audio_full: audio.full,
            url: article.url.clone(),
            source: article.source.clone(),
            timestamp,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>, retention: Duration) -> bool {
        match chrono::Duration::from_std(retention) {
            Ok(retention) => self.timestamp < now - retention,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw(content: &str) -> RawArticle {
        RawArticle {
            title: "Title".to_string(),
            content: content.to_string(),
            url: "https://example.com/a".to_string(),
            source: "example".to_string(),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_truncate_chars_respects_code_points() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("short", 200), "short");
        assert_eq!(truncate_chars("", 10), "");
    }

    #[test]
    fn test_from_raw_enforces_threshold() {
        let short = "x".repeat(MIN_CONTENT_CHARS - 1);
        assert!(Article::from_raw(raw(""), short).is_none());

        let exact = "x".repeat(MIN_CONTENT_CHARS);
        let article = Article::from_raw(raw(""), exact.clone()).unwrap();
        assert_eq!(article.content, exact);
        assert_eq!(article.url, "https://example.com/a");
    }

    #[test]
    fn test_threshold_counts_characters_not_bytes() {
        // 379 two-byte characters: well over 380 bytes, still too short.
        let text = "é".repeat(MIN_CONTENT_CHARS - 1);
        assert!(text.len() > MIN_CONTENT_CHARS);
        assert!(!meets_min_content(&text));
    }

    #[test]
    fn test_tier_settings() {
        assert_eq!(SummaryTier::Short.length_bounds(), (20, 50));
        assert_eq!(SummaryTier::Medium.length_bounds(), (80, 150));
        assert_eq!(SummaryTier::Full.length_bounds(), (150, 300));
        assert_eq!(SummaryTier::Short.fallback_chars(), 200);
        assert_eq!(SummaryTier::Medium.fallback_chars(), 200);
        assert_eq!(SummaryTier::Full.fallback_chars(), 500);
    }

    #[test]
    fn test_record_wire_format() {
        let article = Article::from_raw(raw(""), "y".repeat(400)).unwrap();
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let record = NewsRecord::new(
            "science",
            &article,
            Tiered {
                short: "s".to_string(),
                medium: "m".to_string(),
                full: "f".to_string(),
            },
            Tiered {
                short: Some("/static/audio/a.wav".to_string()),
                medium: None,
                full: Some("/static/audio/c.wav".to_string()),
            },
            timestamp,
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["topic"], "science");
        assert_eq!(json["date"], "2024-03-09");
        assert_eq!(json["summary_full"], "f");
        assert_eq!(json["audio_short"], "/static/audio/a.wav");
        assert!(json["audio_medium"].is_null());
        assert!(json.get("_id").is_none());
    }

    #[test]
    fn test_record_expiry() {
        let article = Article::from_raw(raw(""), "y".repeat(400)).unwrap();
        let now = Utc::now();
        let old = NewsRecord::new(
            "t",
            &article,
            Tiered::default(),
            Tiered::default(),
            now - chrono::Duration::days(3),
        );
        let fresh = NewsRecord::new("t", &article, Tiered::default(), Tiered::default(), now);
        assert!(old.is_expired(now, RETENTION));
        assert!(!fresh.is_expired(now, RETENTION));
    }
}
