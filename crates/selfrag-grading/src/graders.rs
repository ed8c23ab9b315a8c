//! The three binary grading oracles

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use minijinja::context;
use tracing::debug;

use selfrag_core::{
    Adequacy, AdequacyOracle, Groundedness, GroundednessOracle, LLMConfig, LLMProvider, Passage,
    Relevance, RelevanceOracle, Result, format_passages,
};

use crate::callable::ModelCallable;
use crate::prompts;

/// Grades whether a retrieved passage bears on the question.
pub struct RelevanceGrader {
    callable: ModelCallable,
}

impl RelevanceGrader {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            callable: ModelCallable::new(
                provider,
                prompts::RELEVANCE_SYSTEM,
                prompts::RELEVANCE_USER,
                LLMConfig::deterministic(),
            ),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.callable = self.callable.with_timeout(timeout);
        self
    }
}

#[async_trait]
impl RelevanceOracle for RelevanceGrader {
    async fn assess(&self, question: &str, passage: &Passage) -> Result<Relevance> {
        let raw = self
            .callable
            .invoke(context! { document => passage.content.as_str(), question })
            .await?;
        let verdict = Relevance::parse(&raw)?;
        debug!(?verdict, "graded passage relevance");
        Ok(verdict)
    }
}

/// Grades whether a generated answer is supported by the retrieved facts.
pub struct GroundednessGrader {
    callable: ModelCallable,
}

impl GroundednessGrader {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            callable: ModelCallable::new(
                provider,
                prompts::GROUNDEDNESS_SYSTEM,
                prompts::GROUNDEDNESS_USER,
                LLMConfig::deterministic(),
            ),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.callable = self.callable.with_timeout(timeout);
        self
    }
}

#[async_trait]
impl GroundednessOracle for GroundednessGrader {
    async fn assess(&self, documents: &[Passage], generation: &str) -> Result<Groundedness> {
        let facts = format_passages(documents);
        let raw = self
            .callable
            .invoke(context! { facts => facts.as_str(), generation })
            .await?;
        let verdict = Groundedness::parse(&raw)?;
        debug!(?verdict, "graded generation groundedness");
        Ok(verdict)
    }
}

/// Grades whether a generated answer resolves the question.
pub struct AdequacyGrader {
    callable: ModelCallable,
}

impl AdequacyGrader {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            callable: ModelCallable::new(
                provider,
                prompts::ADEQUACY_SYSTEM,
                prompts::ADEQUACY_USER,
                LLMConfig::deterministic(),
            ),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.callable = self.callable.with_timeout(timeout);
        self
    }
}

#[async_trait]
impl AdequacyOracle for AdequacyGrader {
    async fn assess(&self, question: &str, generation: &str) -> Result<Adequacy> {
        let raw = self
            .callable
            .invoke(context! { question, generation })
            .await?;
        let verdict = Adequacy::parse(&raw)?;
        debug!(?verdict, "graded answer adequacy");
        Ok(verdict)
    }
}
