//! Valuation dimensions: alpha/environment separation, risk treatment,
//! terminal value discipline, cyclical vs structural distinction

use regex::Regex;
use std::sync::OnceLock;

use super::{any_match, clamp_score, compile, patterns_firing, Feedback};
use crate::config::GradingPolicy;
use crate::scenario::Scenario;

struct ValuationPatterns {
    separation: Vec<Regex>,
    quantification: Vec<Regex>,
    extrapolation_warning: Vec<Regex>,
    scenario_analysis: Vec<Regex>,
    uncertainty: Vec<Regex>,
    probability_weighted: Regex,
    terminal: Vec<Regex>,
    gdp_anchor: Vec<Regex>,
    consistency: Vec<Regex>,
    cyclical: Vec<Regex>,
    normalized: Vec<Regex>,
}

static PATTERNS: OnceLock<ValuationPatterns> = OnceLock::new();

fn patterns() -> &'static ValuationPatterns {
    PATTERNS.get_or_init(|| ValuationPatterns {
        separation: compile(&[
            r"(?i)alpha.{0,30}(vs|versus|from|and).{0,30}environment",
            r"(?i)company.specific.{0,30}(vs|versus|from).{0,30}(market|sector|macro)",
            r"(?i)idiosyncratic.{0,30}(vs|versus|from).{0,30}(systematic|factor)",
            r"(?i)durable.{0,30}(vs|versus|from).{0,30}(cyclical|temporary)",
            r"(?i)environmental.{0,30}tailwind",
            r"(?i)structural.{0,30}(vs|versus|from).{0,30}cyclical",
        ]),
        quantification: compile(&[
            r"\d+%?\s*(of|from)\s*(growth|outperformance|return)",
            r"(?i)(contributed|drove|explained).{0,30}\d+%",
            r"(?i)\d+.{0,5}%\s*(was|came from|attributable)",
        ]),
        extrapolation_warning: compile(&[
            r"(?i)cannot.{0,20}extrapolate",
            r"(?i)not.{0,15}sustainable",
            r"(?i)temporary.{0,15}(tailwind|boost|benefit)",
            r"(?i)normalize",
            r"(?i)revert.{0,15}mean",
        ]),
        scenario_analysis: compile(&[
            r"(?i)bull.{0,10}case",
            r"(?i)bear.{0,10}case",
            r"(?i)base.{0,10}case",
            r"(?i)scenario.{0,20}analysis",
            r"(?i)sensitivity",
            r"(?i)probability.weighted",
        ]),
        uncertainty: compile(&[
            r"(?i)uncertainty",
            r"(?i)not.{0,10}hedged",
            r"(?i)residual.{0,10}risk",
            r"(?i)what.{0,15}wrong",
            r"(?i)unhedged",
        ]),
        probability_weighted: Regex::new(r"(?i)\d+%\s*(probability|chance|likelihood)")
            .expect("probability weighted"),
        terminal: compile(&[
            r"(?i)terminal.{0,15}(growth|value|rate)",
            r"(?i)perpetuity",
            r"(?i)exit.{0,10}multiple",
            r"(?i)long.term.{0,10}growth",
        ]),
        gdp_anchor: compile(&[
            r"(?i)(at|near|around).{0,10}GDP",
            r"(?i)nominal.{0,10}GDP",
            r"(?i)inflation.{0,10}plus",
            r"(?i)(2|3|4)%\s*terminal",
            r"(?i)cannot.{0,20}perpetuity",
        ]),
        consistency: compile(&[
            r"(?i)consistent",
            r"(?i)reinvestment.{0,20}(rate|ratio)",
            r"(?i)ROIC.{0,20}WACC",
            r"(?i)implied.{0,15}(margin|return|growth)",
        ]),
        cyclical: compile(&[
            r"(?i)cyclical.{0,20}(vs|versus|or).{0,20}structural",
            r"(?i)temporary.{0,20}(vs|versus|or).{0,20}permanent",
            r"(?i)normalize",
            r"(?i)mean.{0,10}revert",
            r"(?i)mid.cycle",
            r"(?i)through.cycle",
        ]),
        normalized: compile(&[
            r"(?i)normalized.{0,15}(earnings|margin|revenue)",
            r"(?i)sustainable.{0,15}(level|margin|growth)",
            r"(?i)peak.{0,15}(vs|versus|or).{0,15}trough",
        ]),
    })
}

pub(super) fn score_alpha_environment(
    text: &str,
    _scenario: &Scenario,
    policy: &GradingPolicy,
) -> (f64, String) {
    let steps = &policy.steps;
    let mut score = policy.baseline("alpha_environment");
    let mut fb = Feedback::new();

    let separation_count = patterns_firing(&patterns().separation, text);
    if separation_count >= 2 {
        score += steps.strong;
        fb.push("Strong alpha/environment separation");
    } else if separation_count >= 1 {
        score += steps.moderate;
        fb.push("Some alpha/environment distinction");
    } else {
        score -= steps.minor;
        fb.push("No alpha/environment separation");
    }

    if any_match(&patterns().quantification, text) {
        score += steps.moderate;
        fb.push("Quantifies driver contributions");
    }

    if any_match(&patterns().extrapolation_warning, text) {
        score += steps.minor;
        fb.push("Warns against environmental extrapolation");
    }

    (
        clamp_score(score),
        fb.finish("Standard alpha/environment analysis"),
    )
}

pub(super) fn score_risk_treatment(
    text: &str,
    _scenario: &Scenario,
    policy: &GradingPolicy,
) -> (f64, String) {
    let steps = &policy.steps;
    let mut score = policy.baseline("risk_treatment");
    let mut fb = Feedback::new();

    let scenario_count = patterns_firing(&patterns().scenario_analysis, text);
    if scenario_count >= 3 {
        score += steps.major;
        fb.push("Comprehensive scenario analysis");
    } else if scenario_count >= 2 {
        score += steps.minor;
        fb.push("Includes scenario analysis");
    }

    let uncertainty_count = patterns_firing(&patterns().uncertainty, text);
    if uncertainty_count >= 2 {
        score += steps.moderate;
        fb.push("Explicit uncertainty acknowledgment");
    } else if uncertainty_count >= 1 {
        score += steps.nudge;
        fb.push("Some uncertainty discussion");
    }

    if patterns().probability_weighted.is_match(text) {
        score += steps.moderate;
        fb.push("Probability-weighted scenarios");
    }

    (clamp_score(score), fb.finish("Standard risk treatment"))
}

pub(super) fn score_terminal_value(
    text: &str,
    _scenario: &Scenario,
    policy: &GradingPolicy,
) -> (f64, String) {
    let steps = &policy.steps;
    let mut score = policy.baseline("terminal_value");
    let mut fb = Feedback::new();

    if any_match(&patterns().terminal, text) {
        score += steps.moderate;
        fb.push("Addresses terminal value");
    }

    if any_match(&patterns().gdp_anchor, text) {
        score += steps.major;
        fb.push("Terminal growth anchored appropriately");
    } else {
        fb.push("Terminal growth may lack grounding");
    }

    if any_match(&patterns().consistency, text) {
        score += steps.moderate;
        fb.push("Internal consistency checked");
    }

    (
        clamp_score(score),
        fb.finish("Standard terminal value analysis"),
    )
}

pub(super) fn score_cyclical_structural(
    text: &str,
    _scenario: &Scenario,
    policy: &GradingPolicy,
) -> (f64, String) {
    let steps = &policy.steps;
    let mut score = policy.baseline("cyclical_structural");
    let mut fb = Feedback::new();

    let cyclical_count = patterns_firing(&patterns().cyclical, text);
    if cyclical_count >= 2 {
        score += steps.strong;
        fb.push("Strong cyclical/structural analysis");
    } else if cyclical_count >= 1 {
        score += steps.minor;
        fb.push("Some cyclical awareness");
    }

    if any_match(&patterns().normalized, text) {
        score += steps.major;
        fb.push("Uses normalized metrics");
    }

    (clamp_score(score), fb.finish("Standard cyclical analysis"))
}
