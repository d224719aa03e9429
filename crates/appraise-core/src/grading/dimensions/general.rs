//! General analysis dimensions: factual accuracy, analytical rigor,
//! risk assessment, evidence quality, completeness

use regex::Regex;
use std::sync::OnceLock;

use super::{
    any_match, clamp_score, compile, keywords_present, total_matches, Feedback,
};
use crate::config::GradingPolicy;
use crate::scenario::Scenario;

struct GeneralPatterns {
    citations: Vec<Regex>,
    assumptions: Vec<Regex>,
    logical_structure: Vec<Regex>,
    risk_header: Regex,
    risk_items: Regex,
    probability_impact: Vec<Regex>,
    mitigation: Regex,
    sources: Vec<Regex>,
    calculations: Vec<Regex>,
}

static PATTERNS: OnceLock<GeneralPatterns> = OnceLock::new();

fn patterns() -> &'static GeneralPatterns {
    PATTERNS.get_or_init(|| GeneralPatterns {
        citations: compile(&[
            r"(?i)10-[KQ]",
            r"(?i)Q[1-4]\s*20\d{2}",
            r"(?i)\(source:",
            r"(?i)according to",
            r"(?i)per the",
        ]),
        assumptions: compile(&[
            r"(?i)assuming",
            r"(?i)assumption",
            r"(?i)we assume",
            r"(?i)estimate",
            r"(?i)projected",
        ]),
        logical_structure: compile(&[
            r"(?i)therefore",
            r"(?i)thus",
            r"(?i)because",
            r"(?i)as a result",
            r"(?i)consequently",
        ]),
        risk_header: Regex::new(r"(?i)(##.*risk|risk.*:)").expect("risk header"),
        risk_items: Regex::new(r"[-•\*]|\d+\.").expect("risk items"),
        probability_impact: compile(&[
            r"(?i)probability",
            r"(?i)likelihood",
            r"(?i)impact",
            r"(?i)severity",
            r"\d+%.*risk",
            r"(?i)(high|medium|low)\s*(probability|impact|risk)",
        ]),
        mitigation: Regex::new(r"(?i)mitigat|hedge|protect").expect("mitigation"),
        sources: compile(&[
            r"(?i)10-K",
            r"(?i)10-Q",
            r"(?i)8-K",
            r"(?i)earnings call",
            r"(?i)transcript",
            r"(?i)investor presentation",
            r"(?i)Bloomberg",
            r"(?i)FactSet",
        ]),
        calculations: compile(&[r"=", r"\$\d+.*[x×\*]", r"EPS.*\$", r"P/E.*\d+"]),
    })
}

pub(super) fn score_factual_accuracy(
    text: &str,
    scenario: &Scenario,
    policy: &GradingPolicy,
) -> (f64, String) {
    let steps = &policy.steps;
    let mut score = policy.baseline("factual_accuracy");
    let mut fb = Feedback::new();

    let citation_count = total_matches(&patterns().citations, text);
    if citation_count >= 5 {
        score += steps.minor;
        fb.push("Good citation density");
    } else if citation_count >= 2 {
        score += steps.nudge;
        fb.push("Adequate citations present");
    } else {
        score -= steps.minor;
        fb.push("Insufficient citations");
    }

    // Critical key facts count as addressed when any of their leading terms
    // shows up in the submission
    let lower = text.to_lowercase();
    let facts_found = scenario
        .key_facts
        .iter()
        .filter(|kf| kf.importance == "critical")
        .filter(|kf| {
            kf.fact
                .split_whitespace()
                .take(5)
                .any(|term| term.chars().count() > 4 && lower.contains(&term.to_lowercase()))
        })
        .count();

    if facts_found >= 3 {
        score += steps.minor;
        fb.push("Key facts addressed");
    } else if facts_found >= 1 {
        score += steps.nudge;
        fb.push("Some key facts addressed");
    }

    (clamp_score(score), fb.finish("Standard factual accuracy"))
}

pub(super) fn score_analytical_rigor(
    text: &str,
    _scenario: &Scenario,
    policy: &GradingPolicy,
) -> (f64, String) {
    let steps = &policy.steps;
    let mut score = policy.baseline("analytical_rigor");
    let mut fb = Feedback::new();
    let lower = text.to_lowercase();

    let scenario_count = keywords_present(
        &[
            "bull case",
            "bear case",
            "base case",
            "upside",
            "downside",
            "scenario",
        ],
        &lower,
    );
    if scenario_count >= 3 {
        score += steps.moderate;
        fb.push("Good scenario analysis present");
    } else if scenario_count >= 1 {
        score += steps.nudge;
        fb.push("Some scenario consideration");
    } else {
        score -= steps.minor;
        fb.push("Limited scenario analysis");
    }

    let assumption_count = total_matches(&patterns().assumptions, text);
    if assumption_count >= 5 {
        score += steps.minor;
        fb.push("Assumptions are explicit");
    } else if assumption_count >= 2 {
        score += steps.nudge;
        fb.push("Some assumptions stated");
    }

    if total_matches(&patterns().logical_structure, text) >= 3 {
        score += steps.nudge;
        fb.push("Good logical flow");
    }

    (clamp_score(score), fb.finish("Standard analytical rigor"))
}

pub(super) fn score_risk_assessment(
    text: &str,
    _scenario: &Scenario,
    policy: &GradingPolicy,
) -> (f64, String) {
    let steps = &policy.steps;
    let mut score = policy.baseline("risk_assessment");
    let mut fb = Feedback::new();

    // The risk section runs from the first risk header to the next "##"
    // heading, or to the end of the text
    match patterns().risk_header.find(text) {
        Some(m) => {
            let rest = &text[m.end()..];
            let section = match rest.find("##") {
                Some(next) => &rest[..next],
                None => rest,
            };
            let risk_items = patterns().risk_items.find_iter(section).count();

            if risk_items >= 5 {
                score += steps.major;
                fb.push(format!("Comprehensive risk list ({}+ risks)", risk_items));
            } else if risk_items >= 3 {
                score += steps.minor;
                fb.push(format!("Adequate risk coverage ({} risks)", risk_items));
            } else {
                fb.push("Limited risk identification");
            }
        }
        None => {
            score -= steps.moderate;
            fb.push("No clear risk section");
        }
    }

    if any_match(&patterns().probability_impact, text) {
        score += steps.moderate;
        fb.push("Includes probability/impact assessment");
    }

    if patterns().mitigation.is_match(text) {
        score += steps.nudge;
        fb.push("Discusses risk mitigation");
    }

    (clamp_score(score), fb.finish("Standard risk assessment"))
}

pub(super) fn score_evidence_quality(
    text: &str,
    _scenario: &Scenario,
    policy: &GradingPolicy,
) -> (f64, String) {
    let steps = &policy.steps;
    let mut score = policy.baseline("evidence_quality");
    let mut fb = Feedback::new();

    let source_count = total_matches(&patterns().sources, text);
    if source_count >= 5 {
        score += steps.moderate;
        fb.push("Excellent source citations");
    } else if source_count >= 2 {
        score += steps.minor;
        fb.push("Good source references");
    } else {
        score -= steps.nudge;
        fb.push("Limited source citations");
    }

    if any_match(&patterns().calculations, text) {
        score += steps.minor;
        fb.push("Includes shown calculations");
    }

    (clamp_score(score), fb.finish("Standard evidence quality"))
}

const REQUIRED_SECTIONS: &[(&str, &[&str])] = &[
    ("thesis", &["thesis", "investment case", "recommendation"]),
    ("valuation", &["valuation", "price target", "fair value"]),
    ("risks", &["risk", "downside", "bear case"]),
    ("catalyst", &["catalyst", "trigger", "timeline", "event"]),
    ("position", &["position", "sizing", "allocation", "portfolio"]),
];

pub(super) fn score_completeness(
    text: &str,
    _scenario: &Scenario,
    policy: &GradingPolicy,
) -> (f64, String) {
    let steps = &policy.steps;
    let mut score = policy.baseline("completeness");
    let mut fb = Feedback::new();
    let lower = text.to_lowercase();

    let missing: Vec<&str> = REQUIRED_SECTIONS
        .iter()
        .filter(|(_, keywords)| !keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(section, _)| *section)
        .collect();
    let coverage =
        (REQUIRED_SECTIONS.len() - missing.len()) as f64 / REQUIRED_SECTIONS.len() as f64;

    if coverage >= 0.9 {
        score += steps.strong;
        fb.push("All major sections covered");
    } else if coverage >= 0.7 {
        score += steps.moderate;
        fb.push("Most sections covered");
    } else if coverage >= 0.5 {
        score += steps.nudge;
        fb.push("Some sections missing");
    } else {
        score -= steps.moderate;
        fb.push(format!("Missing sections: {}", missing.join(", ")));
    }

    let has_bull = ["bull", "upside", "positive"].iter().any(|kw| lower.contains(kw));
    let has_bear = ["bear", "downside", "risk", "concern"]
        .iter()
        .any(|kw| lower.contains(kw));
    if has_bull && has_bear {
        score += steps.minor;
        fb.push("Balanced bull/bear presentation");
    }

    (clamp_score(score), fb.finish("Standard completeness"))
}
