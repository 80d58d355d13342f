use std::sync::Arc;

use pulse_core::{Error, Result, Summarizer};

use crate::Config;

pub mod dummy;
pub mod huggingface;

pub use dummy::DummyModel;
pub use huggingface::HuggingFaceModel;

pub const DEFAULT_MODEL: &str = "huggingface";

/// Builds the summarizer named by `config.model_name` (default: Hugging Face).
pub fn create_summarizer(config: &Config) -> Result<Arc<dyn Summarizer>> {
    let name = config.model_name.as_deref().unwrap_or(DEFAULT_MODEL);
    match name.to_lowercase().as_str() {
        "huggingface" | "hf" => Ok(Arc::new(HuggingFaceModel::new(
            config.api_key.clone(),
            config.model_url.clone(),
        )?)),
        "dummy" => Ok(Arc::new(DummyModel::new())),
        other => Err(Error::Config(format!(
            "Unknown summarization model: {} (expected huggingface or dummy)",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_summarizer() {
        let model = create_summarizer(&Config::default()).unwrap();
        assert_eq!(model.name(), "HuggingFace");

        let config = Config {
            model_name: Some("dummy".to_string()),
            ..Default::default()
        };
        assert_eq!(create_summarizer(&config).unwrap().name(), "Dummy");

        let config = Config {
            model_name: Some("gpt".to_string()),
            ..Default::default()
        };
        assert!(create_summarizer(&config).is_err());
    }
}
