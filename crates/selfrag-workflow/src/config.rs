//! Loop configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use selfrag_core::{RagError, Result};

/// Caller-facing knobs of the control loop.
///
/// `step_budget` is the sole termination guarantee against the
/// generate/rewrite oscillation, so it must be finite and positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Maximum number of executed nodes before the run aborts.
    #[serde(default = "default_step_budget")]
    pub step_budget: u32,

    /// Top-k passages requested from the retriever.
    #[serde(default = "default_retrieve_k")]
    pub retrieve_k: usize,

    /// Per-call timeout for oracle/generator/rewriter calls, in milliseconds.
    /// A timeout is a step failure, not a retry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_call_timeout_ms: Option<u64>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            step_budget: default_step_budget(),
            retrieve_k: default_retrieve_k(),
            per_call_timeout_ms: None,
        }
    }
}

fn default_step_budget() -> u32 {
    12
}

fn default_retrieve_k() -> usize {
    4
}

impl WorkflowConfig {
    pub fn validate(&self) -> Result<()> {
        if self.step_budget == 0 {
            return Err(RagError::InvalidConfig(
                "step_budget must be positive".into(),
            ));
        }
        if self.retrieve_k == 0 {
            return Err(RagError::InvalidConfig("retrieve_k must be positive".into()));
        }
        if self.per_call_timeout_ms == Some(0) {
            return Err(RagError::InvalidConfig(
                "per_call_timeout_ms must be positive when set".into(),
            ));
        }
        Ok(())
    }

    pub fn per_call_timeout(&self) -> Option<Duration> {
        self.per_call_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorkflowConfig::default();
        assert_eq!(config.step_budget, 12);
        assert_eq!(config.retrieve_k, 4);
        assert!(config.per_call_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_budget_is_rejected() {
        let config = WorkflowConfig {
            step_budget: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RagError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_k_is_rejected() {
        let config = WorkflowConfig {
            retrieve_k: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_conversion() {
        let config = WorkflowConfig {
            per_call_timeout_ms: Some(1500),
            ..Default::default()
        };
        assert_eq!(config.per_call_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_yaml_deserialization() {
        let yaml = r#"
step_budget: 8
retrieve_k: 6
per_call_timeout_ms: 3000
"#;
        let config: WorkflowConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.step_budget, 8);
        assert_eq!(config.retrieve_k, 6);
        assert_eq!(config.per_call_timeout_ms, Some(3000));
    }

    #[test]
    fn test_yaml_defaults_fill_in() {
        let config: WorkflowConfig = serde_yaml::from_str("step_budget: 5").unwrap();
        assert_eq!(config.step_budget, 5);
        assert_eq!(config.retrieve_k, 4);
    }
}
