//! Shared, read-only state handed to every request handler.

use crate::ai::{GenerationService, ResponseExtractor};
use std::sync::Arc;

/// Default instruction for audio uploads sent without a prompt.
pub const DEFAULT_AUDIO_PROMPT: &str = "Transcribe and explain the contents of this audio";

#[derive(Clone)]
pub struct AppState {
    /// Provider client, created once at startup.
    pub generator: Arc<dyn GenerationService>,
    pub extractor: Arc<ResponseExtractor>,
}

impl AppState {
    /// Build state around an injected provider, using the default extraction strategies.
    pub fn new(generator: Arc<dyn GenerationService>) -> Self {
        Self {
            generator,
            extractor: Arc::new(ResponseExtractor::default()),
        }
    }

    pub fn with_extractor(mut self, extractor: ResponseExtractor) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }
}
