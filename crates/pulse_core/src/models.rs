use std::path::Path;

use async_trait::async_trait;

use crate::types::SummaryTier;
use crate::Result;

#[async_trait]
pub trait Summarizer: Send + Sync {
    fn name(&self) -> &str;

    /// Summarize `text` at the length requested by `tier`
    async fn summarize(&self, text: &str, tier: SummaryTier) -> Result<String>;
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn name(&self) -> &str;

    /// Speak `text` into a single audio file at `output`
    async fn synthesize(&self, text: &str, output: &Path) -> Result<()>;
}
