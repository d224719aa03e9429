//! Scoring profile configuration for appraise
//!
//! Every tuned constant in the grading and reward heuristics lives here:
//! dimension baselines, the increment ladder, critical-check gates, reward
//! weights, and the ideal length window. The defaults reproduce the
//! calibrated production values; an `appraise.toml` can override any subset
//! for recalibration without touching scorer control flow.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Complete scoring policy: grading heuristics plus reward signal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringProfile {
    pub grading: GradingPolicy,
    pub reward: RewardPolicy,
}

impl ScoringProfile {
    /// Load a profile from a TOML file, with defaults for absent fields
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let profile: ScoringProfile = toml::from_str(&content)?;
        Ok(profile)
    }
}

/// Policy constants for rubric-driven grading
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingPolicy {
    /// Pass threshold used when the rubric does not declare one
    pub pass_threshold: f64,
    /// Score returned for dimensions with no registered heuristic
    pub default_score: f64,
    /// Per-dimension starting scores before evidence adjustments
    pub baselines: BTreeMap<String, f64>,
    pub steps: StepPolicy,
    pub risk_section: RiskSectionPolicy,
    pub hallucination: HallucinationPolicy,
}

impl GradingPolicy {
    /// Baseline score for a dimension, falling back to the most
    /// conservative default for unlisted ids
    pub fn baseline(&self, dimension_id: &str) -> f64 {
        self.baselines.get(dimension_id).copied().unwrap_or(50.0)
    }
}

impl Default for GradingPolicy {
    fn default() -> Self {
        let mut baselines = BTreeMap::new();
        for id in ["factual_accuracy", "analytical_rigor", "evidence_quality"] {
            baselines.insert(id.to_string(), 70.0);
        }
        for id in ["risk_assessment", "completeness"] {
            baselines.insert(id.to_string(), 60.0);
        }
        for id in [
            "alpha_environment",
            "risk_treatment",
            "terminal_value",
            "cyclical_structural",
            "risk_classification",
            "hedging_logic",
            "sizing_methodology",
            "risk_placement",
            "uncertainty_judgment",
            "attribution_discipline",
            "hypothesis_testing",
            "contextual_evaluation",
        ] {
            baselines.insert(id.to_string(), 50.0);
        }

        GradingPolicy {
            pass_threshold: 70.0,
            default_score: 70.0,
            baselines,
            steps: StepPolicy::default(),
            risk_section: RiskSectionPolicy::default(),
            hallucination: HallucinationPolicy::default(),
        }
    }
}

/// The increment ladder applied when evidence pattern groups fire.
///
/// Scores move by one of these five magnitudes per group; the ladder keeps
/// adjustments bounded so the hard [0, 100] clamp stays a backstop rather
/// than a routine occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StepPolicy {
    pub nudge: f64,
    pub minor: f64,
    pub moderate: f64,
    pub major: f64,
    pub strong: f64,
}

impl Default for StepPolicy {
    fn default() -> Self {
        StepPolicy {
            nudge: 5.0,
            minor: 10.0,
            moderate: 15.0,
            major: 20.0,
            strong: 25.0,
        }
    }
}

/// Gates for the risk-section critical check
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskSectionPolicy {
    /// Minimum trimmed body length after a risk header for the section to count
    pub min_body_chars: usize,
    /// How far past the header match to look for body content
    pub lookahead_chars: usize,
}

impl Default for RiskSectionPolicy {
    fn default() -> Self {
        RiskSectionPolicy {
            min_body_chars: 50,
            lookahead_chars: 200,
        }
    }
}

/// Gates for the hallucinated-figure critical check
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HallucinationPolicy {
    /// How many leading dollar figures from the submission are examined
    pub max_figures: usize,
    /// Flag once more than this many examined figures match no scenario fact
    pub unmatched_limit: usize,
}

impl Default for HallucinationPolicy {
    fn default() -> Self {
        HallucinationPolicy {
            max_figures: 10,
            unmatched_limit: 5,
        }
    }
}

/// Policy constants for the composite reward signal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardPolicy {
    pub weights: RewardWeights,
    /// Ideal word-count window for the length reward
    pub ideal_min_words: usize,
    pub ideal_max_words: usize,
    /// Floor for submissions shorter than the window
    pub short_floor: f64,
    /// Floor for submissions longer than the window
    pub long_floor: f64,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        RewardPolicy {
            weights: RewardWeights::default(),
            ideal_min_words: 150,
            ideal_max_words: 600,
            short_floor: 0.1,
            long_floor: 0.2,
        }
    }
}

/// Axis weights for the composite reward.
///
/// The length axis is multiplied by accuracy before weighting; these weights
/// scale the four terms of that gated sum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardWeights {
    pub accuracy: f64,
    pub logic: f64,
    pub format: f64,
    pub length: f64,
}

impl Default for RewardWeights {
    fn default() -> Self {
        RewardWeights {
            accuracy: 0.40,
            logic: 0.30,
            format: 0.15,
            length: 0.15,
        }
    }
}
