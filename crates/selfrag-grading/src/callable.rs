//! The single abstraction behind every model-backed collaborator

use std::sync::Arc;
use std::time::Duration;

use minijinja::Environment;
use serde::Serialize;
use tracing::trace;

use selfrag_core::{ChatMessage, LLMConfig, LLMError, LLMProvider};

/// A prompt template bound to a provider.
///
/// `invoke` renders the user-turn template with the supplied slots, sends it
/// together with the fixed system prompt, and applies the per-call timeout if
/// one is configured. A timeout surfaces as [`LLMError::Timeout`].
pub struct ModelCallable {
    provider: Arc<dyn LLMProvider>,
    system_prompt: String,
    user_template: String,
    config: LLMConfig,
    timeout: Option<Duration>,
    env: Environment<'static>,
}

impl ModelCallable {
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        system_prompt: impl Into<String>,
        user_template: impl Into<String>,
        config: LLMConfig,
    ) -> Self {
        Self {
            provider,
            system_prompt: system_prompt.into(),
            user_template: user_template.into(),
            config,
            timeout: None,
            env: Environment::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn invoke(&self, slots: impl Serialize) -> Result<String, LLMError> {
        let rendered = self
            .env
            .render_str(&self.user_template, slots)
            .map_err(|e| LLMError::Template(e.to_string()))?;

        trace!(provider = self.provider.provider_name(), "invoking callable");

        let messages = [
            ChatMessage::system(&self.system_prompt),
            ChatMessage::user(rendered),
        ];

        let call = self.provider.complete(&messages, Some(&self.config));
        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| LLMError::Timeout(limit))??,
            None => call.await?,
        };

        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selfrag_llm::MockProvider;

    fn callable(mock: &MockProvider, user_template: &str) -> ModelCallable {
        ModelCallable::new(
            Arc::new(mock.clone()),
            "system prompt",
            user_template,
            LLMConfig::deterministic(),
        )
    }

    #[tokio::test]
    async fn test_renders_slots_into_user_turn() {
        let mock = MockProvider::with_response("ok");
        let callable = callable(&mock, "Question: {{ question }}");

        let out = callable
            .invoke(minijinja::context! { question => "why?" })
            .await
            .unwrap();
        assert_eq!(out, "ok");

        let call = mock.last_call().unwrap();
        assert_eq!(call.messages.len(), 2);
        assert_eq!(call.messages[0].content, "system prompt");
        assert_eq!(call.messages[1].content, "Question: why?");
        assert_eq!(call.config.unwrap().temperature, Some(0.0));
    }

    #[tokio::test]
    async fn test_timeout_maps_to_llm_error() {
        let mock = MockProvider::with_response("slow");
        mock.set_latency(200);
        let callable =
            callable(&mock, "{{ question }}").with_timeout(Some(Duration::from_millis(10)));

        let err = callable
            .invoke(minijinja::context! { question => "q" })
            .await
            .unwrap_err();
        assert!(matches!(err, LLMError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let mock = MockProvider::new();
        mock.set_error("transport down");
        let callable = callable(&mock, "{{ question }}");

        let err = callable
            .invoke(minijinja::context! { question => "q" })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("transport down"));
    }
}
