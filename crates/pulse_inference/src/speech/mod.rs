use std::path::Path;
use std::sync::Arc;

use pulse_core::{Error, Result, SpeechSynthesizer};

use crate::SpeechConfig;

pub mod coqui;
pub mod silent;

pub use coqui::CoquiTts;
pub use silent::SilentSynthesizer;

pub const DEFAULT_ENGINE: &str = "coqui";
pub const DEFAULT_SPEAKER: &str = "Ana Florence";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Builds the synthesizer named by `config.engine` (default: Coqui TTS server).
pub fn create_synthesizer(config: &SpeechConfig) -> Result<Arc<dyn SpeechSynthesizer>> {
    let engine = config.engine.as_deref().unwrap_or(DEFAULT_ENGINE);
    match engine.to_lowercase().as_str() {
        "coqui" => Ok(Arc::new(CoquiTts::new(
            config.url.clone(),
            &config.speaker,
            &config.language,
        )?)),
        "silent" => Ok(Arc::new(SilentSynthesizer::new())),
        other => Err(Error::Config(format!(
            "Unknown speech engine: {} (expected coqui or silent)",
            other
        ))),
    }
}

pub(crate) async fn ensure_parent_dir(output: &Path) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_synthesizer() {
        let synth = create_synthesizer(&SpeechConfig::default()).unwrap();
        assert_eq!(synth.name(), "Coqui");

        let config = SpeechConfig {
            engine: Some("silent".to_string()),
            ..Default::default()
        };
        assert_eq!(create_synthesizer(&config).unwrap().name(), "Silent");

        let config = SpeechConfig {
            engine: Some("espeak".to_string()),
            ..Default::default()
        };
        assert!(create_synthesizer(&config).is_err());
    }
}
