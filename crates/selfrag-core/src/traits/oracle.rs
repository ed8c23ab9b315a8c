//! Seams between the control loop and its model-backed collaborators
//!
//! The loop depends only on these traits, so tests inject scripted
//! implementations and production wires up the LLM-backed ones.

use async_trait::async_trait;

use crate::error::Result;
use crate::passage::Passage;
use crate::verdict::{Adequacy, Groundedness, Relevance};

/// Grades a single retrieved passage against the active question.
#[async_trait]
pub trait RelevanceOracle: Send + Sync {
    async fn assess(&self, question: &str, passage: &Passage) -> Result<Relevance>;
}

/// Grades a generated answer against the passages it was produced from.
#[async_trait]
pub trait GroundednessOracle: Send + Sync {
    async fn assess(&self, documents: &[Passage], generation: &str) -> Result<Groundedness>;
}

/// Grades whether a generated answer resolves the question.
#[async_trait]
pub trait AdequacyOracle: Send + Sync {
    async fn assess(&self, question: &str, generation: &str) -> Result<Adequacy>;
}

/// Reformulates a question for better retrieval. Never returns an empty
/// string; no convergence guarantee, the step budget is the safety net.
#[async_trait]
pub trait QueryRewriter: Send + Sync {
    async fn rewrite(&self, question: &str) -> Result<String>;
}

/// Produces an answer from the supplied passages only. Grounding is a
/// prompted best-effort contract, verified by the groundedness oracle rather
/// than enforced mechanically.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, question: &str, documents: &[Passage]) -> Result<String>;
}
