//! LLM-backed answer generator

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use minijinja::context;
use tracing::debug;

use selfrag_core::{
    AnswerGenerator, LLMConfig, LLMProvider, Passage, Result, format_passages,
};

use crate::callable::ModelCallable;
use crate::prompts;

const DEFAULT_MAX_CONTEXT_CHARS: usize = 12_000;

/// Generates an answer from the supplied passages.
///
/// Grounding is a prompted contract; the groundedness oracle verifies it
/// after the fact. Concatenated context is truncated at a character bound as
/// a resource limit, not a correctness requirement.
pub struct RagGenerator {
    callable: ModelCallable,
    max_context_chars: usize,
}

impl RagGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            callable: ModelCallable::new(
                provider,
                prompts::GENERATE_SYSTEM,
                prompts::GENERATE_USER,
                LLMConfig::default(),
            ),
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.callable = self.callable.with_timeout(timeout);
        self
    }

    pub fn with_max_context_chars(mut self, max_context_chars: usize) -> Self {
        self.max_context_chars = max_context_chars;
        self
    }

    fn build_context(&self, documents: &[Passage]) -> String {
        truncate_chars(format_passages(documents), self.max_context_chars)
    }
}

#[async_trait]
impl AnswerGenerator for RagGenerator {
    async fn generate(&self, question: &str, documents: &[Passage]) -> Result<String> {
        let context = self.build_context(documents);
        let answer = self
            .callable
            .invoke(context! { question, context => context.as_str() })
            .await?;
        debug!(documents = documents.len(), "generated answer");
        Ok(answer)
    }
}

fn truncate_chars(mut text: String, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text;
    }
    let cut = text
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text.truncate(cut);
    text
}
