//! Scenario context for grading: the facts a submission is graded against
//! and any scenario-declared critical-failure rules.
//!
//! Every field defaults, so grading a submission without a scenario is the
//! same as grading against `Scenario::default()`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppraiseError, Result};

/// One fact from the scenario's source material
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyFact {
    #[serde(default)]
    pub fact: String,
    /// Importance marker; "critical" facts feed the factual-accuracy scorer
    #[serde(default)]
    pub importance: String,
}

/// Scenario-declared evaluation criteria
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationCriteria {
    /// Free-text critical-failure trigger descriptions
    #[serde(default)]
    pub critical_failures: Vec<String>,
}

/// The context a submission is evaluated in
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub key_facts: Vec<KeyFact>,
    #[serde(default)]
    pub evaluation_criteria: EvaluationCriteria,
}

impl Scenario {
    /// Load a scenario from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AppraiseError::ScenarioNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario_is_empty() {
        let scenario = Scenario::default();
        assert!(scenario.key_facts.is_empty());
        assert!(scenario.evaluation_criteria.critical_failures.is_empty());
    }

    #[test]
    fn test_parse_scenario_yaml() {
        let yaml = r#"
id: biotech_phase3_catalyst
title: Biotech Phase 3 Catalyst
key_facts:
  - fact: "Q3 2024 revenue was $45M"
    importance: critical
  - fact: "Cash runway of 14 months"
    importance: high
evaluation_criteria:
  critical_failures:
    - "No probability estimate for trial outcome"
"#;
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scenario.id, "biotech_phase3_catalyst");
        assert_eq!(scenario.key_facts.len(), 2);
        assert_eq!(scenario.key_facts[0].importance, "critical");
        assert_eq!(scenario.evaluation_criteria.critical_failures.len(), 1);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let yaml = "id: x\ndifficulty: advanced\nestimated_time_minutes: 90\n";
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scenario.id, "x");
    }
}
