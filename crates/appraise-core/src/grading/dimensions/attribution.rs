//! Performance attribution dimensions: factor attribution discipline,
//! hypothesis testing rigor, contextual (environment-conditional) evaluation

use regex::Regex;
use std::sync::OnceLock;

use super::{any_match, clamp_score, compile, patterns_firing, Feedback};
use crate::config::GradingPolicy;
use crate::scenario::Scenario;

struct AttributionPatterns {
    factor_decomposition: Vec<Regex>,
    residual_alpha: Vec<Regex>,
    quantified_calc: Regex,
    hypothesis: Vec<Regex>,
    skepticism: Vec<Regex>,
    evidence_based: Vec<Regex>,
    conditional: Vec<Regex>,
    intentionality: Vec<Regex>,
    neutral_skepticism: Vec<Regex>,
}

static PATTERNS: OnceLock<AttributionPatterns> = OnceLock::new();

fn patterns() -> &'static AttributionPatterns {
    PATTERNS.get_or_init(|| AttributionPatterns {
        factor_decomposition: compile(&[
            r"(?i)factor.{0,20}(decomposition|attribution|contribution)",
            r"(?i)factor.{0,20}drag",
            r"(?i)(biotech|small.cap|growth|value|momentum).{0,20}(factor|tilt|exposure)",
            r"(?i)overweight.{0,20}×.{0,20}return",
            r"(?i)\d+%\s*(overweight|underweight).{0,20}-?\d+%",
        ]),
        residual_alpha: compile(&[
            r"(?i)residual.{0,15}alpha",
            r"(?i)after.{0,20}(factor|adjustment)",
            r"(?i)stock.selection.{0,20}(after|net|excluding)",
            r"(?i)(explained|unexplained).{0,15}by.{0,15}factor",
        ]),
        quantified_calc: Regex::new(r"\d+%.{0,15}×.{0,15}-?\d+%").expect("quantified calc"),
        hypothesis: compile(&[
            r"(?i)hypothesis",
            r"(?i)if.{0,20}(true|correct).{0,20}expect",
            r"(?i)falsif",
            r"(?i)(test|testing).{0,20}(belief|assumption|claim)",
            r"(?i)evidence.{0,20}(would|should).{0,20}(show|support)",
        ]),
        skepticism: compile(&[
            r"(?i)(not|doesn't|does not).{0,15}support",
            r"(?i)inconsistent.{0,15}with",
            r"(?i)alternative.{0,15}explanation",
            r"(?i)(question|questioning).{0,15}(PM|narrative|belief)",
        ]),
        evidence_based: compile(&[
            r"(?i)evidence.{0,20}(suggests|shows|indicates)",
            r"(?i)data.{0,15}(suggests|shows|indicates)",
            r"(?i)analysis.{0,15}(suggests|shows|reveals)",
        ]),
        conditional: compile(&[
            r"(?i)conditional.{0,15}on.{0,15}environment",
            r"(?i)control.{0,20}for.{0,20}(factor|environment)",
            r"(?i)after.{0,20}(adjusting|controlling).{0,20}for",
            r"(?i)environment.{0,20}neutral",
            r"(?i)skill.{0,20}(given|conditional|after)",
        ]),
        intentionality: compile(&[
            r"(?i)intentional.{0,20}(vs|versus|or).{0,20}(unintentional|accidental)",
            r"(?i)was.{0,20}(intentional|deliberate|chosen)",
            r"(?i)(chosen|deliberate).{0,20}(bet|exposure|tilt)",
            r"(?i)accidental.{0,20}(accumulation|exposure)",
        ]),
        neutral_skepticism: compile(&[
            r"(?i)(not|wasn't|was not).{0,15}neutral.{0,15}environment",
            r"(?i)silent.{0,15}(rotation|factor|regime)",
            r"(?i)environment.{0,20}(wasn't|was not|not).{0,15}neutral",
        ]),
    })
}

pub(super) fn score_attribution_discipline(
    text: &str,
    _scenario: &Scenario,
    policy: &GradingPolicy,
) -> (f64, String) {
    let steps = &policy.steps;
    let mut score = policy.baseline("attribution_discipline");
    let mut fb = Feedback::new();

    let factor_count = patterns_firing(&patterns().factor_decomposition, text);
    if factor_count >= 3 {
        score += steps.strong;
        fb.push("Strong factor decomposition");
    } else if factor_count >= 1 {
        score += steps.moderate;
        fb.push("Some factor analysis");
    } else {
        fb.push("Limited factor decomposition");
    }

    if any_match(&patterns().residual_alpha, text) {
        score += steps.major;
        fb.push("Calculates residual alpha");
    }

    if patterns().quantified_calc.is_match(text) {
        score += steps.minor;
        fb.push("Shows calculation methodology");
    }

    (clamp_score(score), fb.finish("Standard attribution analysis"))
}

pub(super) fn score_hypothesis_testing(
    text: &str,
    _scenario: &Scenario,
    policy: &GradingPolicy,
) -> (f64, String) {
    let steps = &policy.steps;
    let mut score = policy.baseline("hypothesis_testing");
    let mut fb = Feedback::new();

    let hypothesis_count = patterns_firing(&patterns().hypothesis, text);
    if hypothesis_count >= 2 {
        score += steps.strong;
        fb.push("Strong hypothesis testing");
    } else if hypothesis_count >= 1 {
        score += steps.moderate;
        fb.push("Some hypothesis testing");
    } else {
        fb.push("Limited hypothesis testing");
    }

    if any_match(&patterns().skepticism, text) {
        score += steps.moderate;
        fb.push("Shows appropriate skepticism");
    }

    if any_match(&patterns().evidence_based, text) {
        score += steps.minor;
        fb.push("Evidence-based conclusions");
    }

    (clamp_score(score), fb.finish("Standard hypothesis testing"))
}

pub(super) fn score_contextual_evaluation(
    text: &str,
    _scenario: &Scenario,
    policy: &GradingPolicy,
) -> (f64, String) {
    let steps = &policy.steps;
    let mut score = policy.baseline("contextual_evaluation");
    let mut fb = Feedback::new();

    let conditional_count = patterns_firing(&patterns().conditional, text);
    if conditional_count >= 2 {
        score += steps.major;
        fb.push("Evaluates skill conditionally");
    } else if conditional_count >= 1 {
        score += steps.minor;
        fb.push("Some conditional evaluation");
    }

    if any_match(&patterns().intentionality, text) {
        score += steps.major;
        fb.push("Addresses intentionality question");
    }

    if any_match(&patterns().neutral_skepticism, text) {
        score += steps.minor;
        fb.push("Questions neutral environment assumption");
    }

    (clamp_score(score), fb.finish("Standard contextual evaluation"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringProfile;

    fn policy() -> GradingPolicy {
        ScoringProfile::default().grading
    }

    #[test]
    fn test_attribution_discipline_decomposition() {
        let text = "Factor decomposition shows a biotech factor tilt: 12% overweight \
                    × -8% factor return explains most of the drag. Residual alpha \
                    after factor adjustment is +90bps.";
        let (score, feedback) =
            score_attribution_discipline(text, &Scenario::default(), &policy());
        assert!(feedback.contains("Strong factor decomposition"));
        assert!(feedback.contains("Calculates residual alpha"));
        assert!(feedback.contains("Shows calculation methodology"));
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_attribution_limited_when_absent() {
        let (score, feedback) =
            score_attribution_discipline("The fund went up.", &Scenario::default(), &policy());
        assert_eq!(score, 50.0);
        assert!(feedback.contains("Limited factor decomposition"));
    }

    #[test]
    fn test_hypothesis_testing() {
        let text = "Hypothesis: share gains drive growth. If true, we expect channel \
                    checks to confirm; the data does not support the claim, and an \
                    alternative explanation fits. Evidence suggests a factor rally.";
        let (score, feedback) = score_hypothesis_testing(text, &Scenario::default(), &policy());
        assert!(feedback.contains("Strong hypothesis testing"));
        assert!(feedback.contains("Shows appropriate skepticism"));
        assert!(feedback.contains("Evidence-based conclusions"));
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_contextual_evaluation() {
        let text = "After controlling for the factor regime, skill given the \
                    environment looks thin; the overweight was deliberate, a chosen \
                    bet, but the environment was not neutral.";
        let (score, feedback) =
            score_contextual_evaluation(text, &Scenario::default(), &policy());
        assert!(feedback.contains("Evaluates skill conditionally"));
        assert!(feedback.contains("Addresses intentionality question"));
        assert!(score >= 90.0);
    }
}
