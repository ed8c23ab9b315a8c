//! In-memory term-frequency retrieval index

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use selfrag_core::{Passage, Result, Retriever};

/// Immutable cosine-similarity index over term frequencies.
///
/// Built once ahead of any run; the read path takes `&self` only, so
/// concurrent runs can share one index.
pub struct InMemoryIndex {
    entries: Vec<Entry>,
}

struct Entry {
    passage: Passage,
    tf: HashMap<String, f32>,
    norm: f32,
}

impl InMemoryIndex {
    pub fn build(passages: Vec<Passage>) -> Self {
        let entries = passages
            .into_iter()
            .map(|passage| {
                let tf = term_frequencies(&passage.content);
                let norm = vector_norm(&tf);
                Entry { passage, tf, norm }
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn score(entry: &Entry, query_tf: &HashMap<String, f32>, query_norm: f32) -> f32 {
        if entry.norm == 0.0 || query_norm == 0.0 {
            return 0.0;
        }
        let dot: f32 = query_tf
            .iter()
            .filter_map(|(term, weight)| entry.tf.get(term).map(|w| w * weight))
            .sum();
        dot / (entry.norm * query_norm)
    }
}

#[async_trait]
impl Retriever for InMemoryIndex {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Passage>> {
        let query_tf = term_frequencies(query);
        let query_norm = vector_norm(&query_tf);

        let mut scored: Vec<(f32, &Entry)> = self
            .entries
            .iter()
            .map(|entry| (Self::score(entry, &query_tf, query_norm), entry))
            .filter(|(score, _)| *score > 0.0)
            .collect();

        // stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        debug!(query, hits = scored.len(), "retrieved passages");

        Ok(scored
            .into_iter()
            .map(|(_, entry)| entry.passage.clone())
            .collect())
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

fn term_frequencies(text: &str) -> HashMap<String, f32> {
    let mut tf = HashMap::new();
    for token in tokenize(text) {
        *tf.entry(token).or_insert(0.0) += 1.0;
    }
    tf
}

fn vector_norm(tf: &HashMap<String, f32>) -> f32 {
    tf.values().map(|w| w * w).sum::<f32>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(contents: &[&str]) -> InMemoryIndex {
        InMemoryIndex::build(contents.iter().map(|c| Passage::new(*c)).collect())
    }

    #[tokio::test]
    async fn test_ranks_by_similarity() {
        let index = index(&[
            "cats are small domestic animals",
            "rust is a systems programming language",
            "rust programs compile to native code",
        ]);

        let results = index.retrieve("rust programming", 3).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].content.contains("systems programming"));
    }

    #[tokio::test]
    async fn test_zero_score_passages_are_dropped() {
        let index = index(&["apples and oranges", "trains and boats"]);
        let results = index.retrieve("quantum physics", 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_k_truncates() {
        let index = index(&["dog park", "dog food", "dog bed", "dog toy"]);
        let results = index.retrieve("dog", 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let index = index(&["blue whale", "blue jay", "red fox"]);
        let results = index.retrieve("blue", 5).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content, "blue whale");
        assert_eq!(results[1].content, "blue jay");
    }

    #[tokio::test]
    async fn test_empty_query_returns_nothing() {
        let index = index(&["some content"]);
        let results = index.retrieve("", 3).await.unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_build_len() {
        let index = index(&["a", "b", "c"]);
        assert_eq!(index.len(), 3);
        assert!(!index.is_empty());
    }
}
