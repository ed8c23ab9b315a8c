//! Shared value types: LLM call results, workflow states, trace events

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generation parameters passed through to a model call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LLMConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl LLMConfig {
    /// Deterministic-leaning configuration used by the grading oracles.
    pub fn deterministic() -> Self {
        Self {
            temperature: Some(0.0),
            max_tokens: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMResponse {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl LLMResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: None,
            usage: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }
}

/// Nodes of the retrieval loop. `Accept` and `Abort` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Retrieve,
    GradeDocuments,
    Generate,
    TransformQuery,
    Accept,
    Abort,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Retrieve => "retrieve",
            WorkflowState::GradeDocuments => "grade_documents",
            WorkflowState::Generate => "generate",
            WorkflowState::TransformQuery => "transform_query",
            WorkflowState::Accept => "accept",
            WorkflowState::Abort => "abort",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Accept | WorkflowState::Abort)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot emitted after each executed node so a caller can render progress
/// without reaching into the session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    pub state: WorkflowState,
    pub step: u32,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<String>,
    pub document_count: usize,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_state_terminal() {
        assert!(WorkflowState::Accept.is_terminal());
        assert!(WorkflowState::Abort.is_terminal());
        assert!(!WorkflowState::Retrieve.is_terminal());
        assert!(!WorkflowState::Generate.is_terminal());
    }

    #[test]
    fn test_workflow_state_serde() {
        let json = serde_json::to_string(&WorkflowState::GradeDocuments).unwrap();
        assert_eq!(json, "\"grade_documents\"");
        let state: WorkflowState = serde_json::from_str("\"transform_query\"").unwrap();
        assert_eq!(state, WorkflowState::TransformQuery);
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage::new(120, 40);
        assert_eq!(usage.total_tokens, 160);
    }

    #[test]
    fn test_llm_response_builders() {
        let response = LLMResponse::new("hello")
            .with_model("test-model")
            .with_usage(TokenUsage::new(1, 2));
        assert_eq!(response.content, "hello");
        assert_eq!(response.model.as_deref(), Some("test-model"));
        assert_eq!(response.usage.unwrap().total_tokens, 3);
    }
}
