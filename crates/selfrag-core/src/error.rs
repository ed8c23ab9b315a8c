//! Error taxonomy for the retrieval loop

use thiserror::Error;

use crate::traits::llm::LLMError;
use crate::types::WorkflowState;

pub type Result<T> = std::result::Result<T, RagError>;

/// Workspace-wide error type.
///
/// Budget exhaustion is not represented here: running out of steps is a
/// controlled outcome (`WorkflowState::Abort`), not a failure.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("LLM error: {0}")]
    Llm(#[from] LLMError),

    #[error("model output violated the binary verdict schema: {raw:?}")]
    SchemaViolation { raw: String },

    #[error("step failed in state {state}: {message}")]
    StepExecution {
        state: WorkflowState,
        message: String,
    },

    #[error("query rewriter returned an empty question")]
    EmptyRewrite,

    #[error("retriever error: {0}")]
    Retriever(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RagError {
    pub fn schema_violation(raw: impl Into<String>) -> Self {
        RagError::SchemaViolation { raw: raw.into() }
    }

    pub fn step(state: WorkflowState, message: impl Into<String>) -> Self {
        RagError::StepExecution {
            state,
            message: message.into(),
        }
    }

    /// Attributes an error to the workflow state it occurred in.
    ///
    /// Schema violations keep their identity; errors already tagged with a
    /// state are left alone.
    pub fn in_state(self, state: WorkflowState) -> Self {
        match self {
            err @ RagError::SchemaViolation { .. } => err,
            err @ RagError::StepExecution { .. } => err,
            err => RagError::step(state, err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_state_tags_plain_errors() {
        let err = RagError::EmptyRewrite.in_state(WorkflowState::TransformQuery);
        match err {
            RagError::StepExecution { state, .. } => {
                assert_eq!(state, WorkflowState::TransformQuery);
            }
            other => panic!("expected StepExecution, got {other:?}"),
        }
    }

    #[test]
    fn test_in_state_preserves_schema_violation() {
        let err = RagError::schema_violation("maybe").in_state(WorkflowState::GradeDocuments);
        assert!(matches!(err, RagError::SchemaViolation { .. }));
    }

    #[test]
    fn test_in_state_does_not_retag() {
        let err = RagError::step(WorkflowState::Generate, "boom")
            .in_state(WorkflowState::TransformQuery);
        match err {
            RagError::StepExecution { state, .. } => assert_eq!(state, WorkflowState::Generate),
            other => panic!("expected StepExecution, got {other:?}"),
        }
    }
}
