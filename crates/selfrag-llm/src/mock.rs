use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use selfrag_core::{ChatMessage, LLMConfig, LLMError, LLMProvider, LLMResponse};

/// Scripted provider for testing the loop and the model-backed callables.
#[derive(Clone)]
pub struct MockProvider {
    inner: Arc<RwLock<MockProviderInner>>,
}

struct MockProviderInner {
    responses: Vec<String>,
    response_index: usize,
    cycle_responses: bool,
    call_history: Vec<MockCall>,
    should_error: bool,
    error_message: String,
    latency_ms: u64,
}

#[derive(Debug, Clone)]
pub struct MockCall {
    pub messages: Vec<ChatMessage>,
    pub config: Option<LLMConfig>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MockProviderInner {
                responses: Vec::new(),
                response_index: 0,
                cycle_responses: false,
                call_history: Vec::new(),
                should_error: false,
                error_message: "mock error".to_string(),
                latency_ms: 0,
            })),
        }
    }

    /// Single fixed response for every call.
    pub fn with_response(response: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.set_responses(vec![response.into()], false);
        mock
    }

    /// Scripted response sequence. When the script runs out the last
    /// response repeats, unless `cycle` restarts from the beginning.
    pub fn set_responses(&self, responses: Vec<String>, cycle: bool) {
        let mut inner = self.inner.write();
        inner.responses = responses;
        inner.response_index = 0;
        inner.cycle_responses = cycle;
    }

    pub fn set_error(&self, error_message: impl Into<String>) {
        let mut inner = self.inner.write();
        inner.should_error = true;
        inner.error_message = error_message.into();
    }

    pub fn clear_error(&self) {
        self.inner.write().should_error = false;
    }

    pub fn set_latency(&self, latency_ms: u64) {
        self.inner.write().latency_ms = latency_ms;
    }

    pub fn call_count(&self) -> usize {
        self.inner.read().call_history.len()
    }

    pub fn call_history(&self) -> Vec<MockCall> {
        self.inner.read().call_history.clone()
    }

    pub fn last_call(&self) -> Option<MockCall> {
        self.inner.read().call_history.last().cloned()
    }

    fn next_response(&self) -> String {
        let mut inner = self.inner.write();

        if inner.responses.is_empty() {
            return "mock response".to_string();
        }

        let response = inner.responses[inner.response_index].clone();

        if inner.cycle_responses {
            inner.response_index = (inner.response_index + 1) % inner.responses.len();
        } else if inner.response_index < inner.responses.len() - 1 {
            inner.response_index += 1;
        }

        response
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMProvider for MockProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        config: Option<&LLMConfig>,
    ) -> Result<LLMResponse, LLMError> {
        {
            let mut inner = self.inner.write();
            inner.call_history.push(MockCall {
                messages: messages.to_vec(),
                config: config.cloned(),
            });
        }

        let latency_ms = self.inner.read().latency_ms;
        if latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(latency_ms)).await;
        }

        if self.inner.read().should_error {
            let message = self.inner.read().error_message.clone();
            return Err(LLMError::Other(message));
        }

        Ok(LLMResponse::new(self.next_response()).with_model("mock-model"))
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_response() {
        let mock = MockProvider::with_response("hello");
        let messages = vec![ChatMessage::user("hi")];

        let response = mock.complete(&messages, None).await.unwrap();
        assert_eq!(response.content, "hello");
        assert_eq!(response.model.as_deref(), Some("mock-model"));
    }

    #[tokio::test]
    async fn test_sequential_responses_hold_last() {
        let mock = MockProvider::new();
        mock.set_responses(vec!["first".into(), "second".into()], false);
        let messages = vec![ChatMessage::user("hi")];

        assert_eq!(mock.complete(&messages, None).await.unwrap().content, "first");
        assert_eq!(mock.complete(&messages, None).await.unwrap().content, "second");
        assert_eq!(mock.complete(&messages, None).await.unwrap().content, "second");
    }

    #[tokio::test]
    async fn test_cycling_responses() {
        let mock = MockProvider::new();
        mock.set_responses(vec!["a".into(), "b".into()], true);
        let messages = vec![ChatMessage::user("hi")];

        assert_eq!(mock.complete(&messages, None).await.unwrap().content, "a");
        assert_eq!(mock.complete(&messages, None).await.unwrap().content, "b");
        assert_eq!(mock.complete(&messages, None).await.unwrap().content, "a");
    }

    #[tokio::test]
    async fn test_error_injection() {
        let mock = MockProvider::with_response("unreachable");
        mock.set_error("boom");
        let messages = vec![ChatMessage::user("hi")];

        let err = mock.complete(&messages, None).await.unwrap_err();
        assert!(err.to_string().contains("boom"));

        mock.clear_error();
        assert!(mock.complete(&messages, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_call_history() {
        let mock = MockProvider::with_response("ok");
        assert_eq!(mock.call_count(), 0);

        mock.complete(&[ChatMessage::user("first")], None).await.unwrap();
        mock.complete(&[ChatMessage::user("second")], None).await.unwrap();

        assert_eq!(mock.call_count(), 2);
        let last = mock.last_call().unwrap();
        assert_eq!(last.messages[0].content, "second");
    }
}
