//! Locates generated text in a loosely-shaped provider response.

use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};

/// One way of pulling text out of a raw provider response.
pub trait ExtractionStrategy: Send + Sync {
    fn extract(&self, response: &Value) -> Option<String>;
}

impl<F> ExtractionStrategy for F
where
    F: Fn(&Value) -> Option<String> + Send + Sync,
{
    fn extract(&self, response: &Value) -> Option<String> {
        self(response)
    }
}

/// Reads a string at a JSON pointer such as `/candidates/0/content/text`.
#[derive(Debug, Clone, Copy)]
pub struct PointerStrategy(pub &'static str);

impl ExtractionStrategy for PointerStrategy {
    fn extract(&self, response: &Value) -> Option<String> {
        response
            .pointer(self.0)
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// SDK wrappers nest the REST payload under `response`.
pub const WRAPPED_PARTS_TEXT: PointerStrategy =
    PointerStrategy("/response/candidates/0/content/parts/0/text");
pub const PARTS_TEXT: PointerStrategy = PointerStrategy("/candidates/0/content/parts/0/text");
pub const CONTENT_TEXT: PointerStrategy = PointerStrategy("/candidates/0/content/text");

/// Ordered list of strategies; the first one that yields text wins.
pub struct ResponseExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl ResponseExtractor {
    /// An extractor with no strategies; every response falls back to the dump.
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Append a strategy, tried after the ones already registered.
    pub fn with_strategy<S: ExtractionStrategy + 'static>(mut self, strategy: S) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Return the first generated text fragment, or the whole response as
    /// pretty-printed JSON when no strategy matches.
    ///
    /// Never fails: a strategy that panics is treated like a miss and the
    /// JSON dump is returned instead.
    pub fn extract_text(&self, response: &Value) -> String {
        let found = panic::catch_unwind(AssertUnwindSafe(|| {
            self.strategies
                .iter()
                .find_map(|strategy| strategy.extract(response))
        }));

        match found {
            Ok(Some(text)) => text,
            Ok(None) => Self::dump(response),
            Err(_) => {
                tracing::error!("Response extraction strategy panicked; returning raw response");
                Self::dump(response)
            }
        }
    }

    fn dump(response: &Value) -> String {
        serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string())
    }
}

impl Default for ResponseExtractor {
    fn default() -> Self {
        Self::empty()
            .with_strategy(WRAPPED_PARTS_TEXT)
            .with_strategy(PARTS_TEXT)
            .with_strategy(CONTENT_TEXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_first_part_text() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "T" }, { "text": "ignored" }] }
            }]
        });

        assert_eq!(ResponseExtractor::default().extract_text(&response), "T");
    }

    #[test]
    fn test_wrapped_response_takes_priority() {
        let response = json!({
            "response": {
                "candidates": [{ "content": { "parts": [{ "text": "wrapped" }] } }]
            },
            "candidates": [{ "content": { "parts": [{ "text": "bare" }] } }]
        });

        assert_eq!(ResponseExtractor::default().extract_text(&response), "wrapped");
    }

    #[test]
    fn test_falls_back_to_content_text() {
        let response = json!({
            "candidates": [{ "content": { "text": "flat" } }]
        });

        assert_eq!(ResponseExtractor::default().extract_text(&response), "flat");
    }

    #[test]
    fn test_empty_string_is_a_match() {
        let response = json!({
            "candidates": [{ "content": { "parts": [{ "text": "" }], "text": "other" } }]
        });

        assert_eq!(ResponseExtractor::default().extract_text(&response), "");
    }

    #[test]
    fn test_unrecognized_shape_returns_pretty_json() {
        let response = json!({
            "candidates": [],
            "promptFeedback": { "blockReason": "SAFETY" }
        });

        let text = ResponseExtractor::default().extract_text(&response);
        assert_eq!(text, serde_json::to_string_pretty(&response).unwrap());
        assert!(text.contains("\n  \"promptFeedback\""));
    }

    #[test]
    fn test_null_text_is_treated_as_missing() {
        let response = json!({
            "candidates": [{ "content": { "parts": [{ "text": null }], "text": "fallback" } }]
        });

        assert_eq!(ResponseExtractor::default().extract_text(&response), "fallback");
    }

    #[test]
    fn test_panicking_strategy_returns_dump() {
        let extractor = ResponseExtractor::empty()
            .with_strategy(|_: &Value| -> Option<String> { panic!("trap") })
            .with_strategy(PARTS_TEXT);
        let response = json!({ "candidates": [{ "content": { "parts": [{ "text": "T" }] } }] });

        let text = extractor.extract_text(&response);
        assert_eq!(text, serde_json::to_string_pretty(&response).unwrap());
    }

    #[test]
    fn test_empty_extractor_always_dumps() {
        let response = json!({ "candidates": [{ "content": { "text": "ignored" } }] });

        assert_eq!(
            ResponseExtractor::empty().extract_text(&response),
            serde_json::to_string_pretty(&response).unwrap()
        );
    }

    #[test]
    fn test_custom_strategy_order() {
        let extractor = ResponseExtractor::empty()
            .with_strategy(|v: &Value| v.get("answer").and_then(Value::as_str).map(String::from))
            .with_strategy(PARTS_TEXT);

        assert_eq!(
            extractor.extract_text(&json!({ "answer": "custom" })),
            "custom"
        );
    }
}
