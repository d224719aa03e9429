//! Portfolio construction dimensions: risk classification, hedging logic,
//! sizing methodology, risk placement, uncertainty judgment

use regex::Regex;
use std::sync::OnceLock;

use super::{any_match, clamp_score, compile, patterns_firing, Feedback};
use crate::config::GradingPolicy;
use crate::scenario::Scenario;

struct PortfolioPatterns {
    env_idiosyncratic: Vec<Regex>,
    risk_types: Vec<Regex>,
    hedge_logic: Vec<Regex>,
    hedge_instruments: Vec<Regex>,
    residual_exposure: Vec<Regex>,
    risk_sizing: Vec<Regex>,
    volatility_calcs: Vec<Regex>,
    binary_sizing: Vec<Regex>,
    exposure: Vec<Regex>,
    risk_budget: Vec<Regex>,
    uncertainty: Vec<Regex>,
    what_if: Vec<Regex>,
}

static PATTERNS: OnceLock<PortfolioPatterns> = OnceLock::new();

fn patterns() -> &'static PortfolioPatterns {
    PATTERNS.get_or_init(|| PortfolioPatterns {
        env_idiosyncratic: compile(&[
            r"(?i)environmental.{0,20}(vs|versus|from).{0,20}idiosyncratic",
            r"(?i)systematic.{0,20}(vs|versus|from).{0,20}specific",
            r"(?i)factor.{0,20}(vs|versus|from).{0,20}stock",
            r"(?i)market.{0,20}(vs|versus|from).{0,20}company",
            r"(?i)beta.{0,20}(vs|versus|from).{0,20}alpha",
        ]),
        risk_types: compile(&[
            r"(?i)beta",
            r"(?i)sector",
            r"(?i)factor",
            r"(?i)volatility",
            r"(?i)duration",
            r"(?i)liquidity",
            r"(?i)correlation",
        ]),
        hedge_logic: compile(&[
            r"(?i)hedge.{0,30}environmental",
            r"(?i)hedge.{0,30}(factor|systematic|beta)",
            r"(?i)keep.{0,20}(idiosyncratic|specific|alpha)",
            r"(?i)(don't|do not).{0,15}hedge.{0,15}(alpha|thesis)",
            r"(?i)what.{0,10}(to|not to).{0,10}hedge",
        ]),
        hedge_instruments: compile(&[
            r"(?i)(SPY|XLV|XBI|XLK|QQQ)",
            r"(?i)(ETF|index).{0,15}hedge",
            r"(?i)(put|call|option)",
            r"(?i)futures",
            r"(?i)overlay",
        ]),
        residual_exposure: compile(&[
            r"(?i)residual.{0,15}exposure",
            r"(?i)unhedged.{0,15}(risk|exposure)",
            r"(?i)remain.{0,15}exposed",
            r"(?i)accept.{0,15}(as|exposure)",
        ]),
        risk_sizing: compile(&[
            r"(?i)volatility.{0,20}(adjusted|based|weighted)",
            r"(?i)risk.{0,20}(contribution|parity|weighted)",
            r"(?i)dollar.{0,20}(vs|versus|≠).{0,20}risk",
            r"(?i)notional.{0,20}(vs|versus|≠).{0,20}risk",
            r"(?i)equal.{0,15}(vol|risk|volatility)",
            r"(?i)size.{0,20}(on|for|by).{0,20}risk",
        ]),
        volatility_calcs: compile(&[
            r"\d+%\s*(vol|volatility|σ)",
            r"(?i)(vol|volatility).{0,10}\d+%",
            r"(?i)\$[\d.]+M?.{0,10}(at|×).{0,10}\d+%",
        ]),
        binary_sizing: compile(&[
            r"(?i)binary.{0,20}(risk|event|sizing)",
            r"(?i)max.{0,10}loss",
            r"(?i)event.{0,20}sizing",
            r"(?i)defined.{0,10}risk",
        ]),
        exposure: compile(&[
            r"(?i)gross.{0,10}exposure",
            r"(?i)net.{0,10}exposure",
            r"(?i)portfolio.{0,10}(weight|allocation)",
            r"(?i)risk.{0,10}budget",
        ]),
        risk_budget: compile(&[
            r"(?i)risk.{0,15}contribution",
            r"(?i)risk.{0,15}budget",
            r"(?i)\d+%\s*(of|portfolio).{0,15}(risk|vol)",
        ]),
        uncertainty: compile(&[
            r"(?i)uncertain",
            r"(?i)unknown",
            r"(?i)range.{0,15}outcome",
            r"(?i)confidence",
            r"(?i)probability",
        ]),
        what_if: compile(&[
            r"(?i)what.{0,10}if",
            r"(?i)what.{0,15}change.{0,15}view",
            r"(?i)revisit.{0,15}if",
            r"(?i)monitor.{0,15}for",
        ]),
    })
}

pub(super) fn score_risk_classification(
    text: &str,
    _scenario: &Scenario,
    policy: &GradingPolicy,
) -> (f64, String) {
    let steps = &policy.steps;
    let mut score = policy.baseline("risk_classification");
    let mut fb = Feedback::new();

    let env_idio_count = patterns_firing(&patterns().env_idiosyncratic, text);
    if env_idio_count >= 2 {
        score += steps.strong;
        fb.push("Strong env/idio classification");
    } else if env_idio_count >= 1 {
        score += steps.moderate;
        fb.push("Some risk classification");
    }

    let risk_type_count = patterns_firing(&patterns().risk_types, text);
    if risk_type_count >= 4 {
        score += steps.major;
        fb.push("Comprehensive risk taxonomy");
    } else if risk_type_count >= 2 {
        score += steps.minor;
        fb.push("Multiple risks identified");
    }

    (clamp_score(score), fb.finish("Standard risk classification"))
}

pub(super) fn score_hedging_logic(
    text: &str,
    _scenario: &Scenario,
    policy: &GradingPolicy,
) -> (f64, String) {
    let steps = &policy.steps;
    let mut score = policy.baseline("hedging_logic");
    let mut fb = Feedback::new();

    let hedge_logic_count = patterns_firing(&patterns().hedge_logic, text);
    if hedge_logic_count >= 2 {
        score += steps.strong;
        fb.push("Strong hedging logic");
    } else if hedge_logic_count >= 1 {
        score += steps.moderate;
        fb.push("Some hedging rationale");
    }

    if any_match(&patterns().hedge_instruments, text) {
        score += steps.moderate;
        fb.push("Specific hedge instruments");
    }

    if any_match(&patterns().residual_exposure, text) {
        score += steps.minor;
        fb.push("Acknowledges residual exposure");
    }

    (clamp_score(score), fb.finish("Standard hedging analysis"))
}

pub(super) fn score_sizing_methodology(
    text: &str,
    _scenario: &Scenario,
    policy: &GradingPolicy,
) -> (f64, String) {
    let steps = &policy.steps;
    let mut score = policy.baseline("sizing_methodology");
    let mut fb = Feedback::new();

    let risk_sizing_count = patterns_firing(&patterns().risk_sizing, text);
    if risk_sizing_count >= 2 {
        score += steps.strong;
        fb.push("Strong risk-based sizing");
    } else if risk_sizing_count >= 1 {
        score += steps.moderate;
        fb.push("Some risk-based sizing");
    } else {
        fb.push("May use notional sizing only");
    }

    if any_match(&patterns().volatility_calcs, text) {
        score += steps.moderate;
        fb.push("Includes volatility calculations");
    }

    if any_match(&patterns().binary_sizing, text) {
        score += steps.minor;
        fb.push("Addresses binary event sizing");
    }

    (clamp_score(score), fb.finish("Standard sizing methodology"))
}

pub(super) fn score_risk_placement(
    text: &str,
    _scenario: &Scenario,
    policy: &GradingPolicy,
) -> (f64, String) {
    let steps = &policy.steps;
    let mut score = policy.baseline("risk_placement");
    let mut fb = Feedback::new();

    let exposure_count = patterns_firing(&patterns().exposure, text);
    if exposure_count >= 2 {
        score += steps.major;
        fb.push("Discusses exposure management");
    } else if exposure_count >= 1 {
        score += steps.minor;
        fb.push("Some exposure discussion");
    }

    if any_match(&patterns().risk_budget, text) {
        score += steps.moderate;
        fb.push("Risk budgeting present");
    }

    (clamp_score(score), fb.finish("Standard risk placement"))
}

pub(super) fn score_uncertainty_judgment(
    text: &str,
    _scenario: &Scenario,
    policy: &GradingPolicy,
) -> (f64, String) {
    let steps = &policy.steps;
    let mut score = policy.baseline("uncertainty_judgment");
    let mut fb = Feedback::new();

    let uncertainty_count = patterns_firing(&patterns().uncertainty, text);
    if uncertainty_count >= 3 {
        score += steps.major;
        fb.push("Strong uncertainty acknowledgment");
    } else if uncertainty_count >= 1 {
        score += steps.minor;
        fb.push("Some uncertainty discussion");
    }

    if any_match(&patterns().what_if, text) {
        score += steps.moderate;
        fb.push("Includes contingency planning");
    }

    (clamp_score(score), fb.finish("Standard uncertainty handling"))
}
