pub mod llm;
pub mod oracle;
pub mod retriever;
