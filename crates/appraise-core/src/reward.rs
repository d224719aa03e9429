//! Composite reward signal for preference-pair scoring
//!
//! Four axes in [0, 1] (accuracy, logic, format quality, length) combine
//! into one scalar. The length term is multiplied by accuracy before
//! weighting, so a verbose-but-wrong response earns nothing for its length.
//! That gate is the load-bearing piece of this module; the weights are
//! policy ([`RewardWeights`]), the gate is structure.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde_json::Value;

use crate::config::{RewardPolicy, RewardWeights};
use crate::error::{AppraiseError, Result};
use crate::text;

static LOGIC_CONNECTIVES: &[&str] = &[
    "therefore",
    "because",
    "thus",
    "assuming",
    "given",
    "since",
    "implies",
    "consequently",
    "however",
    "although",
    "whereas",
    "if",
    "then",
];

static STRUCTURE_MARKERS: OnceLock<Regex> = OnceLock::new();
static NUMBERED_STEPS: OnceLock<Regex> = OnceLock::new();

fn structure_markers() -> &'static Regex {
    STRUCTURE_MARKERS.get_or_init(|| {
        Regex::new(r"(?:^|\n)(?:#{1,4}\s|[-*]\s|\d+\.\s|>\s|\|)").expect("structure markers")
    })
}

fn numbered_steps() -> &'static Regex {
    NUMBERED_STEPS.get_or_init(|| Regex::new(r"(?:^|\n)\s*\d+[.)]\s").expect("numbered steps"))
}

/// Multi-faceted reward for one scored text. Each axis is in [0, 1].
#[derive(Debug, Clone)]
pub struct RewardSignal {
    pub accuracy: f64,
    pub logic: f64,
    pub format_quality: f64,
    pub length: f64,
    /// Per-axis provenance notes for annotation output
    pub explanations: BTreeMap<String, String>,
}

impl Default for RewardSignal {
    fn default() -> Self {
        RewardSignal {
            accuracy: 0.5,
            logic: 0.5,
            format_quality: 0.5,
            length: 0.5,
            explanations: BTreeMap::new(),
        }
    }
}

impl RewardSignal {
    /// Composite reward with the default weights
    pub fn composite(&self) -> f64 {
        self.composite_with(&RewardWeights::default())
    }

    /// Composite reward:
    /// `w_acc·acc + w_logic·logic + w_format·format + w_length·(length·acc)`
    pub fn composite_with(&self, weights: &RewardWeights) -> f64 {
        weights.accuracy * self.accuracy
            + weights.logic * self.logic
            + weights.format * self.format_quality
            + weights.length * (self.length * self.accuracy)
    }

    /// JSON representation used in pair annotations
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "accuracy": round4(self.accuracy),
            "logic": round4(self.logic),
            "format_quality": round4(self.format_quality),
            "length": round4(self.length),
            "composite": round4(self.composite()),
            "explanations": self.explanations,
        })
    }
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Accuracy reward: token overlap with a reference answer.
///
/// Neutral 0.5 when no usable reference exists.
pub fn compute_accuracy(text_value: &str, reference: Option<&str>) -> f64 {
    let Some(reference) = reference else {
        return 0.5;
    };

    let text_tokens = text::token_set(text_value);
    let ref_tokens = text::token_set(reference);
    if ref_tokens.is_empty() {
        return 0.5;
    }

    let overlap = ref_tokens.intersection(&text_tokens).count() as f64 / ref_tokens.len() as f64;
    (overlap * 1.2).min(1.0)
}

/// Logic reward: density of logical connectives per sentence, with a bonus
/// for explicit numbered reasoning steps
pub fn compute_logic(text_value: &str) -> f64 {
    let words = text::tokens(text_value);
    if words.is_empty() {
        return 0.0;
    }

    let keyword_hits = words
        .iter()
        .filter(|w| LOGIC_CONNECTIVES.contains(&w.as_str()))
        .count();
    let sentences = text::sentence_count(text_value);

    // One connective per sentence is treated as full marks
    let density = keyword_hits as f64 / sentences as f64;
    let mut score = density.min(1.0);

    if numbered_steps().find_iter(text_value).count() >= 2 {
        score = (score + 0.15).min(1.0);
    }

    score
}

/// Format reward: structural-marker density blended with paragraph-length
/// consistency
pub fn compute_format(text_value: &str) -> f64 {
    if text_value.trim().is_empty() {
        return 0.0;
    }

    let structure_hits = structure_markers().find_iter(text_value).count();
    let paragraphs = text::paragraphs(text_value);
    let n_paras = paragraphs.len().max(1);

    // Expected density is roughly one marker per three paragraphs
    let structure_score = (structure_hits as f64 / n_paras.max(3) as f64).min(1.0);

    let consistency = if paragraphs.len() >= 2 {
        let lengths: Vec<f64> = paragraphs.iter().map(|p| p.chars().count() as f64).collect();
        let avg = lengths.iter().sum::<f64>() / lengths.len() as f64;
        let variance =
            lengths.iter().map(|l| (l - avg).powi(2)).sum::<f64>() / lengths.len() as f64;
        let cv = variance.sqrt() / avg.max(1.0);
        (1.0 - cv).max(0.0)
    } else {
        0.5
    };

    0.6 * structure_score + 0.4 * consistency
}

/// Length reward: triangular window over word count. Full marks inside the
/// ideal window, linear falloff below, hyperbolic falloff above, both
/// floored.
pub fn compute_length(text_value: &str, policy: &RewardPolicy) -> f64 {
    let word_count = text::word_count(text_value);

    if word_count < policy.ideal_min_words {
        (word_count as f64 / policy.ideal_min_words as f64).max(policy.short_floor)
    } else if word_count > policy.ideal_max_words {
        (policy.ideal_max_words as f64 / word_count as f64).max(policy.long_floor)
    } else {
        1.0
    }
}

/// Compute a reward signal for a text.
///
/// Externally supplied rubric scores (0-100 per axis) override the
/// heuristics when present; the heuristic estimators are the fallback path.
pub fn compute_reward(
    text_value: &str,
    _prompt: &str,
    reference: Option<&str>,
    rubric_scores: Option<&BTreeMap<String, f64>>,
    policy: &RewardPolicy,
) -> RewardSignal {
    let mut explanations = BTreeMap::new();

    let (accuracy, logic, format_quality, length) = match rubric_scores {
        Some(scores) => {
            explanations.insert("source".to_string(), "rubric_scores".to_string());
            let axis = |key: &str| scores.get(key).copied().unwrap_or(50.0) / 100.0;
            (
                axis("accuracy"),
                axis("logic"),
                axis("format_quality"),
                axis("length"),
            )
        }
        None => {
            explanations.insert("source".to_string(), "heuristic".to_string());
            (
                compute_accuracy(text_value, reference),
                compute_logic(text_value),
                compute_format(text_value),
                compute_length(text_value, policy),
            )
        }
    };

    RewardSignal {
        accuracy,
        logic,
        format_quality,
        length,
        explanations,
    }
}

/// Annotate a preference pair with reward scores.
///
/// Adds `chosen_score`, `rejected_score`, and a `reward_details` object;
/// every other key on the pair passes through untouched.
pub fn annotate_pair_with_rewards(
    pair: &Value,
    reference: Option<&str>,
    policy: &RewardPolicy,
) -> Result<Value> {
    let obj = pair.as_object().ok_or_else(|| AppraiseError::InvalidPair {
        reason: "pair is not a JSON object".to_string(),
    })?;

    let chosen = obj
        .get("chosen")
        .and_then(Value::as_str)
        .ok_or_else(|| AppraiseError::InvalidPair {
            reason: "missing 'chosen' text".to_string(),
        })?;
    let rejected = obj
        .get("rejected")
        .and_then(Value::as_str)
        .ok_or_else(|| AppraiseError::InvalidPair {
            reason: "missing 'rejected' text".to_string(),
        })?;
    let prompt = obj.get("prompt").and_then(Value::as_str).unwrap_or("");

    let chosen_reward = compute_reward(chosen, prompt, reference, None, policy);
    let rejected_reward = compute_reward(rejected, prompt, reference, None, policy);

    let mut annotated = obj.clone();
    annotated.insert(
        "chosen_score".to_string(),
        serde_json::json!(round4(chosen_reward.composite_with(&policy.weights))),
    );
    annotated.insert(
        "rejected_score".to_string(),
        serde_json::json!(round4(rejected_reward.composite_with(&policy.weights))),
    );
    annotated.insert(
        "reward_details".to_string(),
        serde_json::json!({
            "chosen": chosen_reward.to_json(),
            "rejected": rejected_reward.to_json(),
            "reward_type": "multifaceted",
        }),
    );

    Ok(Value::Object(annotated))
}
