use std::path::Path;

use async_trait::async_trait;
use hound::{SampleFormat, WavSpec, WavWriter};
use pulse_core::{Error, Result, SpeechSynthesizer};

use super::ensure_parent_dir;

const SAMPLE_RATE: u32 = 16_000;
const WORDS_PER_SECOND: f32 = 2.5;
const MAX_SECONDS: u32 = 3600;

/// Writes silent WAV files as long as the text would take to read aloud.
/// Lets the pipeline run without a speech server.
#[derive(Debug, Default)]
pub struct SilentSynthesizer;

impl SilentSynthesizer {
    pub fn new() -> Self {
        Self
    }

    fn sample_count(text: &str) -> u32 {
        let words = text.split_whitespace().count().max(1) as f32;
        let seconds = (words / WORDS_PER_SECOND).ceil().clamp(1.0, MAX_SECONDS as f32);
        (seconds as u32).saturating_mul(SAMPLE_RATE)
    }

    fn write_silence(output: &Path, samples: u32) -> Result<()> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let to_err = |e: hound::Error| Error::Synthesis(format!("{}: {}", output.display(), e));

        let mut writer = WavWriter::create(output, spec).map_err(to_err)?;
        for _ in 0..samples {
            writer.write_sample(0i16).map_err(to_err)?;
        }
        writer.finalize().map_err(to_err)
    }
}

#[async_trait]
impl SpeechSynthesizer for SilentSynthesizer {
    fn name(&self) -> &str {
        "Silent"
    }

    async fn synthesize(&self, text: &str, output: &Path) -> Result<()> {
        ensure_parent_dir(output).await?;

        let samples = Self::sample_count(text);
        let output = output.to_path_buf();
        tokio::task::spawn_blocking(move || Self::write_silence(&output, samples))
            .await
            .map_err(|e| Error::Synthesis(format!("WAV writer task failed: {}", e)))?
    }
}
