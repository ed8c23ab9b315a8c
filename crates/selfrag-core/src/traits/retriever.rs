//! Retrieval interface exposed by the ingestion collaborator

use async_trait::async_trait;

use crate::error::Result;
use crate::passage::Passage;

/// Narrow seam to the pre-built, read-only index.
///
/// Implementations must support concurrent readers; the index is built once,
/// ahead of any run, and never mutated afterwards.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Returns up to `k` passages ranked by relevance to `query`.
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Passage>>;
}
