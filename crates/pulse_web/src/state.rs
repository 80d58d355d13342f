use std::path::PathBuf;
use std::sync::Arc;

use pulse_core::NewsStore;

/// Shared by every request. Handlers only read from the store.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn NewsStore>,
    /// Directory served under `/static/audio`
    pub audio_dir: PathBuf,
}

impl AppState {
    pub fn new(store: Arc<dyn NewsStore>, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            audio_dir: audio_dir.into(),
        }
    }
}
