//! Critical-failure detection
//!
//! A critical failure vetoes a passing verdict regardless of dimension
//! scores. All checks run independently; nothing short-circuits, so a bad
//! submission reports every failure it earns.

use regex::Regex;
use std::sync::OnceLock;

use crate::config::{GradingPolicy, HallucinationPolicy, RiskSectionPolicy};
use crate::scenario::Scenario;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("critical-check pattern"))
        .collect()
}

static RISK_HEADER_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
static GUARANTEE_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
static CALCULATION_CONTEXT_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
static FACT_FIGURE_PATTERN: OnceLock<Regex> = OnceLock::new();
static DOLLAR_FIGURE_PATTERN: OnceLock<Regex> = OnceLock::new();
static PROBABILITY_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
static BINARY_AWARENESS_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

fn risk_header_patterns() -> &'static [Regex] {
    RISK_HEADER_PATTERNS.get_or_init(|| {
        compile(&[
            r"(?i)## ?risks?",
            r"(?i)### ?key risks?",
            r"(?i)risk assessment",
            r"(?i)what could go wrong",
            r"(?i)downside",
            r"(?i)what.{0,20}wrong",
            r"(?i)residual.{0,20}exposure",
            r"(?i)unhedged",
            r"(?i)factor.{0,20}drag",
            r"(?i)critical.{0,20}failure",
            r"(?i)common.{0,20}errors",
        ])
    })
}

fn guarantee_patterns() -> &'static [Regex] {
    GUARANTEE_PATTERNS.get_or_init(|| {
        compile(&[
            r"(?i)guaranteed",
            r"(?i)will definitely",
            r"(?i)certain to",
            r"(?i)cannot fail",
            r"(?i)100% chance",
            r"(?i)risk.free",
        ])
    })
}

fn calculation_context_patterns() -> &'static [Regex] {
    CALCULATION_CONTEXT_PATTERNS.get_or_init(|| {
        compile(&[
            r"(?i)(position|sizing|notional|volatility.adjusted|risk.contribution)",
            r"(?i)(factor.{0,20}decomposition|attribution)",
            r"(?i)(hedge|hedging).{0,20}(instrument|framework)",
            r"(?i)(terminal|dcf|valuation).{0,20}(value|framework)",
        ])
    })
}

fn fact_figure_pattern() -> &'static Regex {
    FACT_FIGURE_PATTERN
        .get_or_init(|| Regex::new(r"\$[\d,.]+[BMK]?|\d+\.?\d*%|\d{4}").expect("fact figure"))
}

fn dollar_figure_pattern() -> &'static Regex {
    DOLLAR_FIGURE_PATTERN.get_or_init(|| Regex::new(r"\$[\d,.]+[BMK]?").expect("dollar figure"))
}

fn probability_patterns() -> &'static [Regex] {
    PROBABILITY_PATTERNS.get_or_init(|| {
        compile(&[
            r"(?i)\d+%",
            r"(?i)probability",
            r"(?i)likelihood",
            r"(?i)chance",
        ])
    })
}

fn binary_awareness_patterns() -> &'static [Regex] {
    BINARY_AWARENESS_PATTERNS.get_or_init(|| {
        compile(&[
            r"(?i)if.*succeed",
            r"(?i)if.*fail",
            r"(?i)success.*scenario",
            r"(?i)failure.*scenario",
            r"(?i)bull.*case",
            r"(?i)bear.*case",
            r"(?i)base.*case",
            r"(?i)upside.*downside",
            r"(?i)asymmetric",
            r"(?i)binary",
            r"(?i)catalyst",
            r"(?i)probability.*success",
            r"(?i)probability.*fail",
            r"(?i)\d+%.*probability",
            r"(?i)\d+%.*chance",
        ])
    })
}

/// Run every critical check against a submission.
///
/// Returns human-readable failure strings; any entry forces a failing
/// verdict downstream.
pub fn check_critical_failures(
    text: &str,
    scenario: &Scenario,
    policy: &GradingPolicy,
) -> Vec<String> {
    let mut failures = Vec::new();

    if detect_hallucination(text, scenario, &policy.hallucination) {
        failures.push("Potential hallucinated data detected".to_string());
    }

    if !has_risk_section(text, &policy.risk_section) {
        failures.push("Missing or inadequate risk assessment section".to_string());
    }

    if has_guarantee_language(text) {
        failures.push("Contains forward-looking guarantees".to_string());
    }

    for rule in &scenario.evaluation_criteria.critical_failures {
        if scenario_rule_fires(text, rule) {
            failures.push(format!("Scenario critical failure: {}", rule));
        }
    }

    failures
}

/// Heuristic hallucination check on dollar figures.
///
/// Calculation-heavy documents (position sizing, factor decomposition,
/// hedging frameworks, DCF work) legitimately produce derived figures not
/// present in the scenario, so the check is skipped entirely when those
/// context signals appear. There is no analogous carve-out for documents
/// citing external sources; figures quoted from, say, a 10-K that is not in
/// the scenario's key facts can still trip this check.
fn detect_hallucination(text: &str, scenario: &Scenario, policy: &HallucinationPolicy) -> bool {
    if calculation_context_patterns().iter().any(|p| p.is_match(text)) {
        return false;
    }

    let fact_values: Vec<String> = scenario
        .key_facts
        .iter()
        .flat_map(|kf| {
            fact_figure_pattern()
                .find_iter(&kf.fact)
                .map(|m| m.as_str().to_string())
                .collect::<Vec<_>>()
        })
        .collect();

    let unmatched = dollar_figure_pattern()
        .find_iter(text)
        .take(policy.max_figures)
        .filter(|fig| !fact_values.iter().any(|fv| fv.contains(fig.as_str())))
        .count();

    unmatched > policy.unmatched_limit
}

/// A risk section counts only when a recognized header is followed by
/// substantive body text, not when the header stands alone.
pub(crate) fn has_risk_section(text: &str, policy: &RiskSectionPolicy) -> bool {
    for pattern in risk_header_patterns() {
        if let Some(m) = pattern.find(text) {
            let after_header: String = text[m.end()..]
                .chars()
                .take(policy.lookahead_chars)
                .collect();
            if after_header.trim().chars().count() >= policy.min_body_chars {
                return true;
            }
        }
    }
    false
}

fn has_guarantee_language(text: &str) -> bool {
    guarantee_patterns().iter().any(|p| p.is_match(text))
}

/// Map a scenario-declared rule description onto a known semantic check.
///
/// Only two descriptions are recognized; anything else is silently skipped,
/// never flagged. That leaves scenario authors able to write rules this
/// detector cannot enforce.
fn scenario_rule_fires(text: &str, rule: &str) -> bool {
    let lower = rule.to_lowercase();

    if lower.contains("no probability estimate") {
        return !probability_patterns().iter().any(|p| p.is_match(text));
    }

    if lower.contains("ignores binary") || lower.contains("binary nature") {
        return !binary_awareness_patterns().iter().any(|p| p.is_match(text));
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{EvaluationCriteria, KeyFact};

    fn policy() -> GradingPolicy {
        GradingPolicy::default()
    }

    #[test]
    fn test_bare_risk_header_does_not_count() {
        assert!(!has_risk_section("## Risks", &policy().risk_section));
        assert!(!has_risk_section("## Risks\n\n", &policy().risk_section));
    }

    #[test]
    fn test_risk_header_with_body_counts() {
        let text = "## Risks\n\nCompetition could intensify and pricing power may erode \
                    if entrants undercut the incumbent offering.";
        assert!(has_risk_section(text, &policy().risk_section));
    }

    #[test]
    fn test_risk_body_just_below_threshold() {
        let text = "## Risks\nshort body";
        assert!(!has_risk_section(text, &policy().risk_section));
    }

    #[test]
    fn test_guarantee_language_detected() {
        let failures =
            check_critical_failures("Returns are guaranteed.", &Scenario::default(), &policy());
        assert!(failures
            .iter()
            .any(|f| f == "Contains forward-looking guarantees"));
    }

    #[test]
    fn test_risk_free_phrase_detected() {
        assert!(has_guarantee_language("This is a risk-free trade"));
        assert!(has_guarantee_language("There is a 100% chance of success"));
        assert!(!has_guarantee_language("Risk is discussed below"));
    }

    #[test]
    fn test_hallucination_flags_unmatched_figures() {
        let scenario = Scenario {
            key_facts: vec![KeyFact {
                fact: "Revenue was $45M in Q3".to_string(),
                importance: "critical".to_string(),
            }],
            ..Scenario::default()
        };
        // Six dollar figures, none present in the scenario facts
        let text = "Revenue of $12B, margin gains worth $3.4B, capex of $900M, \
                    buybacks of $2.2B, a $15B TAM and $7.7B in bookings.";
        assert!(detect_hallucination(text, &scenario, &policy().hallucination));
    }

    #[test]
    fn test_hallucination_respects_matched_figures() {
        let scenario = Scenario {
            key_facts: vec![KeyFact {
                fact: "Q3 revenue of $45M with $12M EBITDA".to_string(),
                importance: "critical".to_string(),
            }],
            ..Scenario::default()
        };
        let text = "Revenue came in at $45M and EBITDA reached $12M.";
        assert!(!detect_hallucination(text, &scenario, &policy().hallucination));
    }

    #[test]
    fn test_hallucination_skipped_for_calculation_context() {
        // Position-sizing language exempts the document even with many
        // figures absent from the scenario
        let text = "Position sizing: $10M notional, $2M at risk, $1.5M hedge, \
                    $3M gross, $4M net, $5M limit, $6M cap.";
        assert!(!detect_hallucination(
            text,
            &Scenario::default(),
            &policy().hallucination
        ));
    }

    #[test]
    fn test_scenario_rule_no_probability() {
        let scenario = Scenario {
            evaluation_criteria: EvaluationCriteria {
                critical_failures: vec![
                    "No probability estimate for the trial outcome".to_string()
                ],
            },
            ..Scenario::default()
        };

        let without = check_critical_failures(
            "The drug will be approved and revenue will follow.",
            &scenario,
            &policy(),
        );
        assert!(without
            .iter()
            .any(|f| f.starts_with("Scenario critical failure:")));

        let with = check_critical_failures(
            "We assign a 60% probability of approval.",
            &scenario,
            &policy(),
        );
        assert!(!with
            .iter()
            .any(|f| f.starts_with("Scenario critical failure:")));
    }

    #[test]
    fn test_scenario_rule_binary_nature() {
        let scenario = Scenario {
            evaluation_criteria: EvaluationCriteria {
                critical_failures: vec!["Ignores binary nature of the event".to_string()],
            },
            ..Scenario::default()
        };

        let aware = check_critical_failures(
            "In the bull case the stock doubles; the bear case halves it.",
            &scenario,
            &policy(),
        );
        assert!(!aware
            .iter()
            .any(|f| f.starts_with("Scenario critical failure:")));
    }

    #[test]
    fn test_unrecognized_scenario_rule_ignored() {
        let scenario = Scenario {
            evaluation_criteria: EvaluationCriteria {
                critical_failures: vec!["Fails to cite the 10-K appendix".to_string()],
            },
            ..Scenario::default()
        };
        let failures = check_critical_failures("Anything.", &scenario, &policy());
        assert!(!failures
            .iter()
            .any(|f| f.starts_with("Scenario critical failure:")));
    }

    #[test]
    fn test_all_checks_run_independently() {
        let failures = check_critical_failures(
            "Guaranteed upside, cannot fail.",
            &Scenario::default(),
            &policy(),
        );
        // Both the missing risk section and the guarantee language report
        assert_eq!(failures.len(), 2);
    }
}
