use std::path::PathBuf;

use clap::Args;
use pulse_inference::{Config as ModelConfig, SpeechConfig};
use pulse_news::ProviderKeys;
use tracing::debug;

pub const SECRETS_FILE: &str = "config/secrets.env";

/// Loads `config/secrets.env`, then `.env`. Variables already set win.
pub fn load_env_files() {
    for path in [SECRETS_FILE, ".env"] {
        if let Err(e) = dotenvy::from_filename(path) {
            debug!(path, error = %e, "Env file not loaded");
        }
    }
}

/// Every setting can come from a flag or the matching environment variable.
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Storage backend: sqlite or memory
    #[arg(long, env = "PULSE_STORAGE", default_value = "sqlite", global = true)]
    pub storage: String,

    #[arg(long, env = "DATABASE_URL", default_value = "pulse_ai.db", global = true)]
    pub database_url: String,

    #[arg(long, env = "NEWSDATA_KEY", hide_env_values = true, global = true)]
    pub newsdata_key: Option<String>,

    #[arg(long, env = "GNEWS_KEY", hide_env_values = true, global = true)]
    pub gnews_key: Option<String>,

    #[arg(long, env = "THENEWS_KEY", hide_env_values = true, global = true)]
    pub thenews_key: Option<String>,

    /// Summarization model: huggingface or dummy
    #[arg(long, env = "PULSE_MODEL", default_value = "huggingface", global = true)]
    pub model: String,

    #[arg(long, env = "PULSE_MODEL_URL", global = true)]
    pub model_url: Option<String>,

    #[arg(long, env = "HF_TOKEN", hide_env_values = true, global = true)]
    pub hf_token: Option<String>,

    /// Speech engine: coqui or silent
    #[arg(long, env = "PULSE_TTS", default_value = "coqui", global = true)]
    pub tts: String,

    #[arg(long, env = "PULSE_TTS_URL", default_value = "http://localhost:5002", global = true)]
    pub tts_url: String,

    #[arg(long, env = "PULSE_AUDIO_DIR", default_value = "static/audio", global = true)]
    pub audio_dir: PathBuf,

    /// Used when RUST_LOG is unset
    #[arg(long, env = "PULSE_LOG", default_value = "info", global = true)]
    pub log_level: String,
}

impl Settings {
    pub fn provider_keys(&self) -> ProviderKeys {
        ProviderKeys {
            newsdata: self.newsdata_key.clone(),
            gnews: self.gnews_key.clone(),
            thenews: self.thenews_key.clone(),
        }
    }

    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            api_key: self.hf_token.clone(),
            model_name: Some(self.model.clone()),
            model_url: self.model_url.clone(),
        }
    }

    pub fn speech_config(&self) -> SpeechConfig {
        SpeechConfig {
            engine: Some(self.tts.clone()),
            url: Some(self.tts_url.clone()),
            ..SpeechConfig::default()
        }
    }
}
