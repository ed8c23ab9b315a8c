//! LLM-backed query rewriter

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use minijinja::context;
use tracing::debug;

use selfrag_core::{LLMConfig, LLMProvider, QueryRewriter, RagError, Result};

use crate::callable::ModelCallable;
use crate::prompts;

/// Reformulates a question for better vector-store retrieval.
pub struct LlmQueryRewriter {
    callable: ModelCallable,
}

impl LlmQueryRewriter {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            callable: ModelCallable::new(
                provider,
                prompts::REWRITE_SYSTEM,
                prompts::REWRITE_USER,
                LLMConfig::default(),
            ),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.callable = self.callable.with_timeout(timeout);
        self
    }
}

#[async_trait]
impl QueryRewriter for LlmQueryRewriter {
    async fn rewrite(&self, question: &str) -> Result<String> {
        let raw = self.callable.invoke(context! { question }).await?;
        let rewritten = raw.trim().to_string();
        if rewritten.is_empty() {
            return Err(RagError::EmptyRewrite);
        }
        debug!(from = question, to = %rewritten, "rewrote question");
        Ok(rewritten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selfrag_llm::MockProvider;

    #[tokio::test]
    async fn test_rewrite_trims_output() {
        let mock = MockProvider::with_response("  What are the BBA passing criteria?  \n");
        let rewriter = LlmQueryRewriter::new(Arc::new(mock));

        let out = rewriter.rewrite("bba pass marks?").await.unwrap();
        assert_eq!(out, "What are the BBA passing criteria?");
    }

    #[tokio::test]
    async fn test_empty_rewrite_is_an_error() {
        let mock = MockProvider::with_response("   ");
        let rewriter = LlmQueryRewriter::new(Arc::new(mock));

        let err = rewriter.rewrite("anything").await.unwrap_err();
        assert!(matches!(err, RagError::EmptyRewrite));
    }
}
