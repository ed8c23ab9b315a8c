//! Recursive character text splitter

use std::collections::VecDeque;

use selfrag_core::{Passage, RagError, Result};

const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Splits text into overlapping chunks, preferring paragraph boundaries,
/// then line boundaries, then word boundaries, then raw characters.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::InvalidConfig("chunk_size must be positive".into()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::InvalidConfig(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &SEPARATORS)
            .into_iter()
            .map(|chunk| chunk.trim().to_string())
            .filter(|chunk| !chunk.is_empty())
            .collect()
    }

    /// Splits and wraps each chunk as a [`Passage`] carrying its index.
    pub fn split_into_passages(&self, text: &str) -> Vec<Passage> {
        self.split(text)
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| Passage::new(chunk).with_metadata("chunk", i))
            .collect()
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let (sep_index, sep) = separators
            .iter()
            .enumerate()
            .find(|(_, s)| s.is_empty() || text.contains(**s))
            .map(|(i, s)| (i, *s))
            .unwrap_or((separators.len() - 1, ""));

        if sep.is_empty() {
            return self.split_chars(text);
        }

        let remaining = &separators[sep_index + 1..];
        let mut pieces = Vec::new();
        for piece in text.split(sep) {
            if piece.len() <= self.chunk_size {
                pieces.push(piece.to_string());
            } else {
                pieces.extend(self.split_recursive(piece, remaining));
            }
        }

        self.merge(pieces, sep)
    }

    /// Greedily packs pieces into chunks, retaining a tail of pieces within
    /// the overlap budget when a chunk is flushed.
    fn merge(&self, pieces: Vec<String>, sep: &str) -> Vec<String> {
        let sep_len = sep.len();
        let mut chunks = Vec::new();
        let mut window: VecDeque<String> = VecDeque::new();

        for piece in pieces {
            let extended = joined_len(&window, sep_len)
                + if window.is_empty() { 0 } else { sep_len }
                + piece.len();

            if extended > self.chunk_size && !window.is_empty() {
                chunks.push(join(&window, sep));

                while !window.is_empty()
                    && (joined_len(&window, sep_len) > self.chunk_overlap
                        || joined_len(&window, sep_len) + sep_len + piece.len() > self.chunk_size)
                {
                    window.pop_front();
                }
            }

            window.push_back(piece);
        }

        if !window.is_empty() {
            chunks.push(join(&window, sep));
        }

        chunks
    }

    fn split_chars(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let step = self.chunk_size - self.chunk_overlap;
        let mut out = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            out.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }

        out
    }
}

fn joined_len(window: &VecDeque<String>, sep_len: usize) -> usize {
    if window.is_empty() {
        return 0;
    }
    let content: usize = window.iter().map(|p| p.len()).sum();
    content + sep_len * (window.len() - 1)
}

fn join(window: &VecDeque<String>, sep: &str) -> String {
    window
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_chunk() {
        let splitter = TextSplitter::new(100, 20).unwrap();
        let chunks = splitter.split("a short paragraph");
        assert_eq!(chunks, vec!["a short paragraph"]);
    }

    #[test]
    fn test_chunks_respect_size() {
        let splitter = TextSplitter::new(40, 10).unwrap();
        let text = "one two three four five six seven eight nine ten eleven twelve";
        for chunk in splitter.split(text) {
            assert!(chunk.len() <= 40, "chunk too large: {chunk:?}");
        }
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let splitter = TextSplitter::new(20, 0).unwrap();
        let chunks = splitter.split("first paragraph\n\nsecond one");
        assert_eq!(chunks, vec!["first paragraph", "second one"]);
    }

    #[test]
    fn test_order_is_preserved() {
        let splitter = TextSplitter::new(20, 5).unwrap();
        let text = "alpha beta gamma delta epsilon zeta";
        let chunks = splitter.split(text);
        let alpha = chunks.iter().position(|c| c.contains("alpha")).unwrap();
        let zeta = chunks.iter().position(|c| c.contains("zeta")).unwrap();
        assert!(alpha < zeta);
    }

    #[test]
    fn test_overlap_repeats_tail() {
        let splitter = TextSplitter::new(20, 10).unwrap();
        let chunks = splitter.split("one two three four five six seven");
        assert!(chunks.len() >= 2);
        // consecutive chunks share at least one word
        for pair in chunks.windows(2) {
            let tail_word = pair[0].split_whitespace().last().unwrap();
            let head_words: Vec<&str> = pair[1].split_whitespace().collect();
            assert!(
                head_words.contains(&tail_word),
                "no overlap between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_unbreakable_run_falls_back_to_chars() {
        let splitter = TextSplitter::new(10, 2).unwrap();
        let chunks = splitter.split(&"x".repeat(25));
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 10);
        }
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(TextSplitter::new(0, 0).is_err());
        assert!(TextSplitter::new(10, 10).is_err());
        assert!(TextSplitter::new(10, 20).is_err());
    }

    #[test]
    fn test_split_into_passages_carries_index() {
        let splitter = TextSplitter::new(15, 0).unwrap();
        let passages = splitter.split_into_passages("first part\n\nsecond part");
        assert_eq!(passages.len(), 2);
        assert_eq!(passages[0].metadata.get("chunk"), Some(&0.into()));
        assert_eq!(passages[1].metadata.get("chunk"), Some(&1.into()));
    }
}
