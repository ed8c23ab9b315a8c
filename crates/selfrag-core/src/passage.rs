//! Retrieved document passages

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A retrieved unit of document text plus opaque source metadata.
///
/// Immutable once retrieved; the session's working set is replaced wholesale
/// at each retrieval and filtering step rather than mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub content: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Passage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Joins passage contents with blank lines, the form the generator and the
/// groundedness oracle consume as context.
pub fn format_passages(passages: &[Passage]) -> String {
    passages
        .iter()
        .map(|p| p.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passage_metadata() {
        let passage = Passage::new("some text").with_metadata("chunk", 3);
        assert_eq!(passage.content, "some text");
        assert_eq!(passage.metadata.get("chunk"), Some(&serde_json::json!(3)));
    }

    #[test]
    fn test_format_passages() {
        let passages = vec![Passage::new("first"), Passage::new("second")];
        assert_eq!(format_passages(&passages), "first\n\nsecond");
        assert_eq!(format_passages(&[]), "");
    }
}
