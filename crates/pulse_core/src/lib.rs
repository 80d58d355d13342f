pub mod error;
pub mod models;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use models::{SpeechSynthesizer, Summarizer};
pub use storage::NewsStore;
pub use types::{
    char_len, meets_min_content, truncate_chars, Article, NewsRecord, RawArticle, SummaryTier,
    Tiered, AUDIO_ROUTE, DEFAULT_TOPIC, MIN_CONTENT_CHARS, RECENT_LIMIT, RETENTION,
};
