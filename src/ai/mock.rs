use super::{GenerationService, Part};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum MockReply {
    Response(Value),
    Failure(String),
}

/// In-memory [`GenerationService`] that replays queued replies and records requests.
#[derive(Clone)]
pub struct MockGenerationClient {
    replies: Arc<Mutex<Vec<MockReply>>>,
    requests: Arc<Mutex<Vec<Vec<Part>>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockGenerationClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Queue a reply carrying `text` in the usual `candidates` shape.
    pub fn with_text_response(self, text: &str) -> Self {
        self.with_raw_response(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] }
            }]
        }))
    }

    pub fn with_raw_response(self, response: Value) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Response(response));
        self
    }

    /// Queue a provider failure with the given message.
    pub fn with_error(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Failure(message.to_string()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Parts received by each call, oldest first.
    pub fn requests(&self) -> Vec<Vec<Part>> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationService for MockGenerationClient {
    async fn generate_content(&self, parts: Vec<Part>) -> Result<Value> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        self.requests.lock().unwrap().push(parts);

        let replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            // Default mock response
            return Ok(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "mock response" }] }
                }]
            }));
        }

        let index = (*count - 1) % replies.len();
        match &replies[index] {
            MockReply::Response(value) => Ok(value.clone()),
            MockReply::Failure(message) => Err(Error::AiProvider(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_default_response() {
        let client = MockGenerationClient::new();

        let response = client.generate_content(vec![Part::text("hi")]).await.unwrap();
        assert_eq!(
            response["candidates"][0]["content"]["parts"][0]["text"],
            "mock response"
        );
    }

    #[tokio::test]
    async fn test_mock_cycles_replies_and_counts_calls() {
        let client = MockGenerationClient::new()
            .with_text_response("first")
            .with_error("boom");

        assert_eq!(client.get_call_count(), 0);

        let first = client.generate_content(vec![]).await.unwrap();
        assert_eq!(first["candidates"][0]["content"]["parts"][0]["text"], "first");

        let err = client.generate_content(vec![]).await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(ref m) if m == "boom"));

        // Should cycle back
        assert!(client.generate_content(vec![]).await.is_ok());
        assert_eq!(client.get_call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_records_requests() {
        let client = MockGenerationClient::new();

        client
            .generate_content(vec![Part::text("a"), Part::inline_data("image/png", b"x")])
            .await
            .unwrap();

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0][0], Part::text("a"));
        assert!(matches!(requests[0][1], Part::InlineData { .. }));
    }
}
