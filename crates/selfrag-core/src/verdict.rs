//! Binary grading verdicts
//!
//! Each grading oracle is constrained to a closed two-value enum. Model
//! output is validated immediately after the call; anything outside the
//! schema is a [`RagError::SchemaViolation`], never a silent default.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Whether a retrieved passage bears on the question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relevance {
    Relevant,
    Irrelevant,
}

impl Relevance {
    pub fn parse(raw: &str) -> Result<Self> {
        match normalize(raw).as_str() {
            "yes" | "relevant" => Ok(Relevance::Relevant),
            "no" | "irrelevant" => Ok(Relevance::Irrelevant),
            _ => Err(RagError::schema_violation(raw)),
        }
    }

    pub fn is_relevant(self) -> bool {
        self == Relevance::Relevant
    }
}

/// Whether a generated answer's claims are supported by the supplied facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Groundedness {
    Grounded,
    Ungrounded,
}

impl Groundedness {
    pub fn parse(raw: &str) -> Result<Self> {
        match normalize(raw).as_str() {
            "yes" | "grounded" => Ok(Groundedness::Grounded),
            "no" | "ungrounded" => Ok(Groundedness::Ungrounded),
            _ => Err(RagError::schema_violation(raw)),
        }
    }

    pub fn is_grounded(self) -> bool {
        self == Groundedness::Grounded
    }
}

/// Whether a generated answer resolves the user's question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adequacy {
    Adequate,
    Inadequate,
}

impl Adequacy {
    pub fn parse(raw: &str) -> Result<Self> {
        match normalize(raw).as_str() {
            "yes" | "adequate" => Ok(Adequacy::Adequate),
            "no" | "inadequate" => Ok(Adequacy::Inadequate),
            _ => Err(RagError::schema_violation(raw)),
        }
    }

    pub fn is_adequate(self) -> bool {
        self == Adequacy::Adequate
    }
}

/// Strips surrounding whitespace, quotes and trailing punctuation before the
/// case-insensitive comparison. Models asked for a bare "yes"/"no" still
/// occasionally wrap it.
fn normalize(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '.' || c == '!')
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevance_parse_yes_no() {
        assert_eq!(Relevance::parse("yes").unwrap(), Relevance::Relevant);
        assert_eq!(Relevance::parse("no").unwrap(), Relevance::Irrelevant);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Relevance::parse("Yes").unwrap(), Relevance::Relevant);
        assert_eq!(Groundedness::parse("NO").unwrap(), Groundedness::Ungrounded);
        assert_eq!(Adequacy::parse("  YES ").unwrap(), Adequacy::Adequate);
    }

    #[test]
    fn test_parse_tolerates_quoting() {
        assert_eq!(Relevance::parse("\"yes\"").unwrap(), Relevance::Relevant);
        assert_eq!(Adequacy::parse("no.").unwrap(), Adequacy::Inadequate);
    }

    #[test]
    fn test_parse_enum_words() {
        assert_eq!(Relevance::parse("relevant").unwrap(), Relevance::Relevant);
        assert_eq!(
            Groundedness::parse("grounded").unwrap(),
            Groundedness::Grounded
        );
        assert_eq!(Adequacy::parse("inadequate").unwrap(), Adequacy::Inadequate);
    }

    #[test]
    fn test_parse_rejects_free_text() {
        for raw in ["maybe", "yes, because the document mentions it", ""] {
            let err = Relevance::parse(raw).unwrap_err();
            assert!(matches!(err, RagError::SchemaViolation { .. }), "{raw:?}");
        }
    }

    #[test]
    fn test_parse_is_idempotent() {
        for _ in 0..3 {
            assert_eq!(Groundedness::parse("yes").unwrap(), Groundedness::Grounded);
        }
    }
}
