//! Ingestion collaborator: text splitting and an in-memory retrieval index
//!
//! The control loop only ever sees the [`selfrag_core::Retriever`] seam; this
//! crate provides a self-contained implementation of it for plain text input.

pub mod memory;
pub mod splitter;

pub use memory::InMemoryIndex;
pub use splitter::TextSplitter;
