use std::path::Path;

use async_trait::async_trait;
use pulse_core::{Error, Result, SpeechSynthesizer};
use reqwest::Client;
use tracing::debug;

use super::{ensure_parent_dir, DEFAULT_LANGUAGE, DEFAULT_SPEAKER};

pub const DEFAULT_URL: &str = "http://localhost:5002";

/// Client for a Coqui TTS server (`tts-server`), which answers
/// `GET /api/tts` with WAV bytes.
#[derive(Debug)]
pub struct CoquiTts {
    client: Client,
    base_url: String,
    speaker: String,
    language: String,
}

impl CoquiTts {
    pub fn new(base_url: Option<String>, speaker: &str, language: &str) -> Result<Self> {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_URL.to_string());
        url::Url::parse(&base_url).map_err(|e| Error::InvalidUrl(format!("{}: {}", base_url, e)))?;
        let or_default = |value: &str, default: &str| {
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };
        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            speaker: or_default(speaker, DEFAULT_SPEAKER),
            language: or_default(language, DEFAULT_LANGUAGE),
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for CoquiTts {
    fn name(&self) -> &str {
        "Coqui"
    }

    async fn synthesize(&self, text: &str, output: &Path) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/api/tts", self.base_url))
            .query(&[
                ("text", text),
                ("speaker_id", self.speaker.as_str()),
                ("language_id", self.language.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Synthesis(format!("TTS server returned {}", status)));
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(Error::Synthesis("TTS server returned no audio".to_string()));
        }

        ensure_parent_dir(output).await?;
        tokio::fs::write(output, &audio).await?;
        debug!(path = %output.display(), bytes = audio.len(), "Audio written");
        Ok(())
    }
}
