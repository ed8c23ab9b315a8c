//! Core types and traits for the selfrag retrieval loop

pub mod error;
pub mod message;
pub mod passage;
pub mod traits;
pub mod types;
pub mod verdict;

pub use error::{RagError, Result};
pub use message::{ChatMessage, Role};
pub use passage::{Passage, format_passages};
pub use traits::llm::{LLMError, LLMProvider};
pub use traits::oracle::{
    AdequacyOracle, AnswerGenerator, GroundednessOracle, QueryRewriter, RelevanceOracle,
};
pub use traits::retriever::Retriever;
pub use types::{LLMConfig, LLMResponse, TokenUsage, TraceEvent, WorkflowState};
pub use verdict::{Adequacy, Groundedness, Relevance};
