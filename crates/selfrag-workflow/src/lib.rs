//! The self-corrective retrieval control loop
//!
//! Sequences retrieval, passage grading, generation, generation grading and
//! query rewriting until an answer is accepted or the step budget runs out.
//! Collaborators come in through the trait seams in `selfrag-core`; the loop
//! holds no global state and one [`Workflow`] serves concurrent runs.

pub mod config;
pub mod engine;
pub mod state;

pub use config::WorkflowConfig;
pub use engine::Workflow;
pub use state::{RunOutcome, SessionState, WorkflowEvent};
