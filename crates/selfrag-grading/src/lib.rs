//! Model-backed callables of the retrieval loop
//!
//! Three binary grading oracles, a query rewriter and an answer generator,
//! all built on one [`ModelCallable`] abstraction: a prompt template plus a
//! provider plus an optional per-call timeout.

pub mod callable;
pub mod generate;
pub mod graders;
pub mod prompts;
pub mod rewrite;

pub use callable::ModelCallable;
pub use generate::RagGenerator;
pub use graders::{AdequacyGrader, GroundednessGrader, RelevanceGrader};
pub use rewrite::LlmQueryRewriter;
