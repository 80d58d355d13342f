use pulse_core::{Result, Summarizer, SummaryTier};

/// Offline summarizer: keeps the first words of the text, up to the tier's
/// maximum length.
#[derive(Debug, Default)]
pub struct DummyModel;

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Summarizer for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn summarize(&self, text: &str, tier: SummaryTier) -> Result<String> {
        let (_, max_words) = tier.length_bounds();
        let words: Vec<&str> = text.split_whitespace().take(max_words as usize).collect();
        Ok(words.join(" "))
    }
}
