//! Heuristic dimension scorers
//!
//! One scorer per rubric dimension id, dispatched through a fixed table.
//! Every scorer has the same shape: start from the profile baseline, move
//! by bounded ladder steps as evidence pattern groups fire, clamp to
//! [0, 100], and report which groups fired as semicolon-joined feedback.

mod attribution;
mod general;
mod portfolio;
mod valuation;

use regex::Regex;

use crate::config::GradingPolicy;
use crate::scenario::Scenario;

/// Signature shared by all dimension scorers
pub type ScorerFn = fn(&str, &Scenario, &GradingPolicy) -> (f64, String);

/// Dispatch table from dimension id to scoring heuristic.
///
/// Adding a dimension means adding a row here; ids not in the table fall
/// through to the neutral default in [`score_dimension`].
const SCORERS: &[(&str, ScorerFn)] = &[
    ("factual_accuracy", general::score_factual_accuracy),
    ("analytical_rigor", general::score_analytical_rigor),
    ("risk_assessment", general::score_risk_assessment),
    ("evidence_quality", general::score_evidence_quality),
    ("completeness", general::score_completeness),
    ("alpha_environment", valuation::score_alpha_environment),
    ("risk_treatment", valuation::score_risk_treatment),
    ("terminal_value", valuation::score_terminal_value),
    ("cyclical_structural", valuation::score_cyclical_structural),
    ("risk_classification", portfolio::score_risk_classification),
    ("hedging_logic", portfolio::score_hedging_logic),
    ("sizing_methodology", portfolio::score_sizing_methodology),
    ("risk_placement", portfolio::score_risk_placement),
    ("uncertainty_judgment", portfolio::score_uncertainty_judgment),
    (
        "attribution_discipline",
        attribution::score_attribution_discipline,
    ),
    ("hypothesis_testing", attribution::score_hypothesis_testing),
    (
        "contextual_evaluation",
        attribution::score_contextual_evaluation,
    ),
];

/// Score one dimension of a submission.
///
/// Unknown dimension ids never error; they score at the profile's neutral
/// default so grading always completes.
pub fn score_dimension(
    text: &str,
    scenario: &Scenario,
    dimension_id: &str,
    policy: &GradingPolicy,
) -> (f64, String) {
    match SCORERS.iter().find(|(id, _)| *id == dimension_id) {
        Some((_, scorer)) => scorer(text, scenario, policy),
        None => (policy.default_score, "Default score applied".to_string()),
    }
}

/// Ids with a registered scoring heuristic, in dispatch order
pub fn known_dimension_ids() -> impl Iterator<Item = &'static str> {
    SCORERS.iter().map(|(id, _)| *id)
}

pub(crate) fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("scorer pattern"))
        .collect()
}

/// Total match occurrences across a pattern group
pub(crate) fn total_matches(regexes: &[Regex], text: &str) -> usize {
    regexes.iter().map(|r| r.find_iter(text).count()).sum()
}

/// How many patterns in a group match at least once
pub(crate) fn patterns_firing(regexes: &[Regex], text: &str) -> usize {
    regexes.iter().filter(|r| r.is_match(text)).count()
}

pub(crate) fn any_match(regexes: &[Regex], text: &str) -> bool {
    regexes.iter().any(|r| r.is_match(text))
}

/// How many keywords appear as substrings of the lowercased text
pub(crate) fn keywords_present(keywords: &[&str], lower_text: &str) -> usize {
    keywords.iter().filter(|kw| lower_text.contains(*kw)).count()
}

/// Accumulates fired-group feedback; joins with "; " or falls back to the
/// dimension's default string when nothing fired
#[derive(Default)]
pub(crate) struct Feedback {
    parts: Vec<String>,
}

impl Feedback {
    pub fn new() -> Self {
        Feedback::default()
    }

    pub fn push(&mut self, part: impl Into<String>) {
        self.parts.push(part.into());
    }

    pub fn finish(self, default: &str) -> String {
        if self.parts.is_empty() {
            default.to_string()
        } else {
            self.parts.join("; ")
        }
    }
}

/// Hard clamp: no scorer may return outside [0, 100]
pub(crate) fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}
