//! AI provider integration for content generation
//!
//! Provides the provider-facing seam used by the HTTP handlers, the Gemini
//! `generateContent` client behind it, and the extractor that pulls the
//! generated text out of whatever response shape comes back.

pub mod extract;
pub mod gemini;
pub mod mock;

pub use extract::{ExtractionStrategy, PointerStrategy, ResponseExtractor};
pub use gemini::types::{Content, InlineData, Part};
pub use gemini::GeminiClient;
pub use mock::MockGenerationClient;

use crate::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A single-turn content generation call.
///
/// Implementations send `parts` as one user turn and hand back the raw
/// provider response; locating the text is left to [`ResponseExtractor`].
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate_content(&self, parts: Vec<Part>) -> Result<Value>;
}
