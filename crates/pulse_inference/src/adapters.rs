//! Fallback behaviour around the model backends: summaries fall back to
//! truncated content, speech failures are reported instead of raised.

use std::path::Path;
use std::sync::Arc;

use pulse_core::{truncate_chars, SpeechSynthesizer, Summarizer, SummaryTier, Tiered};
use tracing::{info, warn};

pub struct SummaryGenerator {
    model: Arc<dyn Summarizer>,
}

impl SummaryGenerator {
    pub fn new(model: Arc<dyn Summarizer>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Never fails: a model error yields the first
    /// [`SummaryTier::fallback_chars`] characters of `content`.
    pub async fn summarize(&self, content: &str, tier: SummaryTier) -> String {
        match self.model.summarize(content, tier).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(
                    tier = %tier,
                    model = self.model.name(),
                    error = %e,
                    "Summarization failed, truncating content"
                );
                truncate_chars(content, tier.fallback_chars())
            }
        }
    }

    /// Short, medium and full summaries, generated one after another.
    pub async fn summarize_all(&self, content: &str) -> Tiered<String> {
        let mut summaries = Tiered::default();
        for tier in SummaryTier::ALL {
            *summaries.get_mut(tier) = self.summarize(content, tier).await;
        }
        summaries
    }
}

pub struct AudioGenerator {
    engine: Arc<dyn SpeechSynthesizer>,
}

impl AudioGenerator {
    pub fn new(engine: Arc<dyn SpeechSynthesizer>) -> Self {
        Self { engine }
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Returns whether the file was written. Failures are logged only.
    pub async fn speak(&self, text: &str, output: &Path) -> bool {
        match self.engine.synthesize(text, output).await {
            Ok(()) => {
                info!(path = %output.display(), "🔊 Audio generated");
                true
            }
            Err(e) => {
                warn!(
                    path = %output.display(),
                    engine = self.engine.name(),
                    error = %e,
                    "TTS failed"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pulse_core::{Error, Result};
    use std::sync::Mutex;

    struct FailingModel;

    #[async_trait]
    impl Summarizer for FailingModel {
        fn name(&self) -> &str {
            "failing"
        }

        async fn summarize(&self, _text: &str, _tier: SummaryTier) -> Result<String> {
            Err(Error::Inference("model not loaded".to_string()))
        }
    }

    struct RecordingModel {
        calls: Mutex<Vec<SummaryTier>>,
    }

    #[async_trait]
    impl Summarizer for RecordingModel {
        fn name(&self) -> &str {
            "recording"
        }

        async fn summarize(&self, _text: &str, tier: SummaryTier) -> Result<String> {
            self.calls.lock().unwrap().push(tier);
            Ok(format!("{} summary", tier))
        }
    }

    struct FailingEngine;

    #[async_trait]
    impl SpeechSynthesizer for FailingEngine {
        fn name(&self) -> &str {
            "failing"
        }

        async fn synthesize(&self, _text: &str, _output: &Path) -> Result<()> {
            Err(Error::Synthesis("no GPU".to_string()))
        }
    }

    #[tokio::test]
    async fn test_fallback_truncates_exactly() {
        let generator = SummaryGenerator::new(Arc::new(FailingModel));
        let content: String = (0..700).map(|i| char::from(b'a' + (i % 26) as u8)).collect();

        let short = generator.summarize(&content, SummaryTier::Short).await;
        let medium = generator.summarize(&content, SummaryTier::Medium).await;
        let full = generator.summarize(&content, SummaryTier::Full).await;

        assert_eq!(short, content[..200]);
        assert_eq!(medium, content[..200]);
        assert_eq!(full, content[..500]);
    }

    #[tokio::test]
    async fn test_fallback_on_short_multibyte_content() {
        let generator = SummaryGenerator::new(Arc::new(FailingModel));
        let content = "ñ".repeat(150);
        assert_eq!(generator.summarize(&content, SummaryTier::Full).await, content);
    }

    #[tokio::test]
    async fn test_summarize_all_runs_each_tier_in_order() {
        let model = Arc::new(RecordingModel {
            calls: Mutex::new(Vec::new()),
        });
        let generator = SummaryGenerator::new(model.clone());

        let summaries = generator.summarize_all("content").await;
        assert_eq!(summaries.short, "short summary");
        assert_eq!(summaries.medium, "medium summary");
        assert_eq!(summaries.full, "full summary");
        assert_eq!(*model.calls.lock().unwrap(), SummaryTier::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_speak_reports_failure() {
        let generator = AudioGenerator::new(Arc::new(FailingEngine));
        assert!(!generator.speak("hello", Path::new("/nonexistent/a.wav")).await);
    }
}
