//! Session state and the observable run surface

use chrono::Utc;
use serde::{Deserialize, Serialize};

use selfrag_core::{Passage, TraceEvent, WorkflowState};

/// Mutable record threaded through one run. Exclusively owned by that run;
/// nothing here is shared across invocations.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Current active query; overwritten by rewrites.
    pub question: String,
    /// Latest produced answer; absent until first generation.
    pub generation: Option<String>,
    /// Current working set of candidate context, replaced wholesale at each
    /// retrieval and filtering step.
    pub documents: Vec<Passage>,
    pub rewrite_count: u32,
    pub generate_count: u32,
    pub steps_taken: u32,
}

impl SessionState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            generation: None,
            documents: Vec::new(),
            rewrite_count: 0,
            generate_count: 0,
            steps_taken: 0,
        }
    }

    pub(crate) fn trace(&self, state: WorkflowState) -> TraceEvent {
        TraceEvent {
            state,
            step: self.steps_taken,
            question: self.question.clone(),
            generation: self.generation.clone(),
            document_count: self.documents.len(),
            timestamp: Utc::now(),
        }
    }
}

/// Final result of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    /// `Accept`, or `Abort` when the step budget ran out first.
    pub final_state: WorkflowState,
    /// Best available answer: the accepted generation, or on abort the last
    /// one produced, possibly none.
    pub answer: Option<String>,
    pub documents: Vec<Passage>,
    pub steps_taken: u32,
    pub rewrite_count: u32,
    pub generate_count: u32,
}

impl RunOutcome {
    pub fn accepted(&self) -> bool {
        self.final_state == WorkflowState::Accept
    }
}

/// Items of the per-run trace stream: one `Transition` per executed node,
/// then exactly one `Completed`. Errors end the stream as `Err` items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowEvent {
    Transition(TraceEvent),
    Completed(RunOutcome),
}

impl WorkflowEvent {
    pub fn as_transition(&self) -> Option<&TraceEvent> {
        match self {
            WorkflowEvent::Transition(event) => Some(event),
            WorkflowEvent::Completed(_) => None,
        }
    }

    pub fn as_completed(&self) -> Option<&RunOutcome> {
        match self {
            WorkflowEvent::Completed(outcome) => Some(outcome),
            WorkflowEvent::Transition(_) => None,
        }
    }
}
