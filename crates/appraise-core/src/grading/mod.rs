//! Rubric-driven grading of analyst submissions
//!
//! The pipeline runs in a fixed order: critical-failure checks first, then
//! one heuristic scorer per rubric dimension, then weighted aggregation.
//! Grading never fails on malformed or missing optional input; the worst a
//! submission can do is score badly.

pub mod aggregate;
pub mod critical;
pub mod dimensions;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::ScoringProfile;
use crate::rubric::Rubric;
use crate::scenario::Scenario;

/// Result of grading one submission against a rubric
#[derive(Debug, Clone, Serialize)]
pub struct GradingResult {
    pub dimension_scores: BTreeMap<String, f64>,
    pub critical_failures: Vec<String>,
    pub detailed_feedback: BTreeMap<String, String>,
    pub overall_score: f64,
    pub passed: bool,
}

/// Engine for grading submissions against an evaluation rubric
pub struct GradingEngine<'a> {
    rubric: &'a Rubric,
    profile: &'a ScoringProfile,
}

impl<'a> GradingEngine<'a> {
    /// Create an engine for one rubric
    pub fn new(rubric: &'a Rubric, profile: &'a ScoringProfile) -> Self {
        GradingEngine { rubric, profile }
    }

    /// Grade a submission against the scenario and rubric.
    ///
    /// Returns `(dimension_scores, critical_failures, detailed_feedback)`.
    /// Overall score and pass/fail are the caller's concern, via
    /// [`aggregate::calculate_overall_score`] and
    /// [`aggregate::determine_pass_fail`].
    pub fn grade(
        &self,
        submission: &str,
        scenario: &Scenario,
    ) -> (BTreeMap<String, f64>, Vec<String>, BTreeMap<String, String>) {
        let critical_failures =
            critical::check_critical_failures(submission, scenario, &self.profile.grading);

        let mut dimension_scores = BTreeMap::new();
        let mut detailed_feedback = BTreeMap::new();

        for dimension in &self.rubric.dimensions {
            let (score, feedback) = dimensions::score_dimension(
                submission,
                scenario,
                &dimension.id,
                &self.profile.grading,
            );
            tracing::debug!(dimension = %dimension.id, score, "dimension_scored");
            dimension_scores.insert(dimension.id.clone(), score);
            detailed_feedback.insert(dimension.id.clone(), feedback);
        }

        (dimension_scores, critical_failures, detailed_feedback)
    }

    /// Grade and aggregate in one step, producing a full [`GradingResult`]
    pub fn grade_to_result(&self, submission: &str, scenario: &Scenario) -> GradingResult {
        let (dimension_scores, critical_failures, detailed_feedback) =
            self.grade(submission, scenario);

        let overall_score = aggregate::calculate_overall_score(&dimension_scores, self.rubric);
        let passed = aggregate::determine_pass_fail(
            overall_score,
            &critical_failures,
            self.rubric.pass_threshold,
        );

        GradingResult {
            dimension_scores,
            critical_failures,
            detailed_feedback,
            overall_score,
            passed,
        }
    }
}
