use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use pulse_core::{Article, NewsRecord, NewsStore, Result, SummaryTier, Tiered, AUDIO_ROUTE};
use pulse_inference::{AudioGenerator, SummaryGenerator};
use uuid::Uuid;

use crate::loader::NewsLoader;
use crate::logging::Logger;

/// Outcome of one topic pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicReport {
    pub topic: String,
    pub fetched: usize,
    pub stored: usize,
    pub failed: usize,
}

/// Runs the pipeline: fetch, summarize, synthesize, persist. Every step is
/// awaited in order; nothing runs concurrently.
pub struct Processor {
    loader: NewsLoader,
    summaries: SummaryGenerator,
    audio: AudioGenerator,
    storage: Arc<dyn NewsStore>,
    audio_dir: PathBuf,
}

impl Processor {
    pub fn new(
        loader: NewsLoader,
        summaries: SummaryGenerator,
        audio: AudioGenerator,
        storage: Arc<dyn NewsStore>,
        audio_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            loader,
            summaries,
            audio,
            storage,
            audio_dir: audio_dir.into(),
        }
    }

    pub fn loader(&self) -> &NewsLoader {
        &self.loader
    }

    pub fn storage(&self) -> Arc<dyn NewsStore> {
        self.storage.clone()
    }

    pub fn audio_dir(&self) -> &PathBuf {
        &self.audio_dir
    }

    /// Summarizes all tiers, writes one audio file per tier and appends the
    /// record. A failed synthesis leaves that tier's audio reference empty;
    /// a store error is returned.
    pub async fn process_article(
        &self,
        article: &Article,
        topic: &str,
        logger: &Logger,
    ) -> Result<NewsRecord> {
        logger.info(&format!("🤖 Summarizing with {}", self.summaries.model_name()));
        let summaries = self.summaries.summarize_all(&article.content).await;

        let mut audio: Tiered<Option<String>> = Tiered::default();
        for tier in SummaryTier::ALL {
            let file_name = format!("{}.wav", Uuid::new_v4());
            let path = self.audio_dir.join(&file_name);
            logger.debug(&format!("🎙️ {} audio -> {}", tier, path.display()));
            if self.audio.speak(summaries.get(tier), &path).await {
                *audio.get_mut(tier) = Some(format!("{}/{}", AUDIO_ROUTE, file_name));
            }
        }

        let record = NewsRecord::new(topic, article, summaries, audio, Utc::now());
        self.storage.insert(&record).await?;
        logger.info("💾 Stored");
        Ok(record)
    }

    pub async fn process_topic(&self, topic: &str, max_articles: usize) -> TopicReport {
        let logger = Logger::new().with_new_prefixes(format!("[{}]", topic));
        logger.info("📰 Processing topic");

        let articles = self.loader.get_news(topic, max_articles).await;
        let mut report = TopicReport {
            topic: topic.to_string(),
            fetched: articles.len(),
            ..TopicReport::default()
        };

        let total = articles.len();
        for (i, article) in articles.iter().enumerate() {
            let logger = logger.clone().with_prefix(format!("[{}/{}]", i + 1, total));
            logger.info(&format!("Processing: {}", article.title));
            match self.process_article(article, topic, &logger).await {
                Ok(_) => report.stored += 1,
                Err(e) => {
                    logger.error(&format!("❌ Failed to process {}: {}", article.url, e));
                    report.failed += 1;
                }
            }
        }

        logger.info(&format!(
            "✅ Done: {} fetched, {} stored, {} failed",
            report.fetched, report.stored, report.failed
        ));
        report
    }

    /// One pass over `topics`, in order.
    pub async fn process_topics(&self, topics: &[String], max_articles: usize) -> Vec<TopicReport> {
        let mut reports = Vec::with_capacity(topics.len());
        for topic in topics {
            reports.push(self.process_topic(topic, max_articles).await);
        }
        reports
    }
}
