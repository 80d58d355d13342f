use std::fmt;

pub mod adapters;
pub mod models;
pub mod speech;

pub use adapters::{AudioGenerator, SummaryGenerator};
pub use models::create_summarizer;
pub use speech::create_synthesizer;

/// Summarization backend settings.
#[derive(Clone, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub model_url: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("model_url", &self.model_url)
            .finish()
    }
}

/// Speech synthesis backend settings.
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub engine: Option<String>,
    pub url: Option<String>,
    pub speaker: String,
    pub language: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            engine: None,
            url: None,
            speaker: speech::DEFAULT_SPEAKER.to_string(),
            language: speech::DEFAULT_LANGUAGE.to_string(),
        }
    }
}

pub mod prelude {
    pub use super::models::create_summarizer;
    pub use super::speech::create_synthesizer;
    pub use super::{AudioGenerator, Config, SpeechConfig, SummaryGenerator};
    pub use pulse_core::{Error, Result, SpeechSynthesizer, Summarizer, SummaryTier, Tiered};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_debug_redacts_key() {
        let config = Config {
            api_key: Some("hf_secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hf_secret"));
        assert!(debug.contains("<redacted>"));
    }
}
