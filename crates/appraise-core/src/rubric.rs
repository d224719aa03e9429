//! Rubric definitions: weighted scoring dimensions, critical-failure rules,
//! and the pass threshold.
//!
//! Rubrics are authored in YAML. Both weight conventions seen in the wild
//! are supported: fractional weights summing to ~1.0 and integer percentage
//! weights summing to ~100. See [`WeightConvention`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppraiseError, Result};

/// One named axis of quality assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dimension {
    /// Key into the scorer dispatch table
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Relative weight (fraction or percentage, per the rubric's convention)
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

/// A weighted set of scoring dimensions plus critical-failure rules
/// and a pass threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rubric {
    /// Scoring dimensions. A rubric without dimensions is degenerate but
    /// legal: it grades to an overall score of 0.0.
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
    /// Free-text critical-failure rule descriptions
    #[serde(default)]
    pub critical_failures: Vec<String>,
    /// Minimum overall score to pass
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: f64,
}

fn default_pass_threshold() -> f64 {
    70.0
}

impl Default for Rubric {
    fn default() -> Self {
        Rubric {
            dimensions: Vec::new(),
            critical_failures: Vec::new(),
            pass_threshold: default_pass_threshold(),
        }
    }
}

/// Which weight scale a rubric's dimensions use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightConvention {
    /// Fractional weights summing to ~1.0
    Fraction,
    /// Integer percentage weights summing to ~100
    Percentage,
}

impl Rubric {
    /// Parse a rubric from YAML text.
    ///
    /// A document that is not a mapping at all is the one hard failure;
    /// missing optional fields all default.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let rubric: Rubric =
            serde_yaml::from_str(yaml).map_err(|e| AppraiseError::InvalidRubric {
                reason: e.to_string(),
            })?;
        rubric.validate();
        Ok(rubric)
    }

    /// Load a rubric from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AppraiseError::RubricNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Sum of all dimension weights
    pub fn total_weight(&self) -> f64 {
        self.dimensions.iter().map(|d| d.weight).sum()
    }

    /// Detect the weight convention in force.
    ///
    /// A total above 10 is read as percentages; anything else as fractions.
    /// This mirrors how rubrics are written in practice, but a rubric of
    /// eleven-plus fractional dimensions or a lone percentage dimension can
    /// misread. An explicit convention field is the eventual fix.
    pub fn weight_convention(&self) -> WeightConvention {
        if self.total_weight() > 10.0 {
            WeightConvention::Percentage
        } else {
            WeightConvention::Fraction
        }
    }

    /// Warn when dimension weights stray from either convention's expected
    /// sum. Never fatal: grading proceeds on whatever weights are present.
    fn validate(&self) {
        if self.dimensions.is_empty() {
            return;
        }
        let total = self.total_weight();
        let consistent = match self.weight_convention() {
            WeightConvention::Fraction => (total - 1.0).abs() < 0.05,
            WeightConvention::Percentage => (total - 100.0).abs() < 5.0,
        };
        if !consistent {
            tracing::warn!(total_weight = total, "rubric weights sum to neither ~1 nor ~100");
        }
    }
}
