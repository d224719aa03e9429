//! Pairwise preference extraction from K-way rankings
//!
//! A ranking of K outputs yields every ordered (better, worse) pair:
//! K(K-1)/2 preference pairs, each carrying enough metadata to trace it
//! back to its ranking session. Pairs compose directly with
//! [`crate::reward::annotate_pair_with_rewards`].

use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::Value;
use ulid::Ulid;

use crate::error::{AppraiseError, Result};

/// Number of pairwise comparisons extractable from a K-way ranking
pub fn count_pairs(k: usize) -> usize {
    k * k.saturating_sub(1) / 2
}

/// Expand a ranking into all pairwise preference pairs.
///
/// `ranked_labels` is ordered best-first; `outputs` maps label to text.
/// Every label in the ranking must have an output. A fresh session id is
/// minted when none is supplied, so pairs from one ranking stay groupable.
pub fn extract_pairwise_preferences(
    ranked_labels: &[String],
    outputs: &BTreeMap<String, String>,
    prompt: &str,
    source: &str,
    tags: &[String],
    session_id: Option<&str>,
) -> Result<Vec<Value>> {
    for label in ranked_labels {
        if !outputs.contains_key(label) {
            return Err(AppraiseError::InvalidValue {
                context: "ranked label".to_string(),
                value: label.clone(),
            });
        }
    }

    let session_id = session_id
        .map(str::to_string)
        .unwrap_or_else(|| Ulid::new().to_string());
    let total_k = ranked_labels.len();
    let timestamp = Utc::now().to_rfc3339();

    let mut pairs = Vec::with_capacity(count_pairs(total_k));
    for i in 0..total_k {
        for j in (i + 1)..total_k {
            let chosen_label = &ranked_labels[i];
            let rejected_label = &ranked_labels[j];

            pairs.push(serde_json::json!({
                "timestamp": &timestamp,
                "prompt": prompt,
                "chosen": &outputs[chosen_label],
                "rejected": &outputs[rejected_label],
                "tags": tags,
                "source": source,
                "mode": "ranking",
                "ranking_metadata": {
                    "session_id": &session_id,
                    "total_k": total_k,
                    "chosen_rank": i + 1,
                    "rejected_rank": j + 1,
                    "rank_margin": j - i,
                    "chosen_label": chosen_label,
                    "rejected_label": rejected_label,
                    "full_ranking": ranked_labels,
                },
            }));
        }
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outputs_of(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_count_pairs() {
        assert_eq!(count_pairs(0), 0);
        assert_eq!(count_pairs(1), 0);
        assert_eq!(count_pairs(2), 1);
        assert_eq!(count_pairs(4), 6);
        assert_eq!(count_pairs(5), 10);
    }

    #[test]
    fn test_extract_produces_all_pairs() {
        let ranked: Vec<String> = ["a", "c", "b", "d"].iter().map(|s| s.to_string()).collect();
        let outputs = outputs_of(&[
            ("a", "best output"),
            ("b", "third output"),
            ("c", "second output"),
            ("d", "worst output"),
        ]);

        let pairs = extract_pairwise_preferences(
            &ranked,
            &outputs,
            "Analyze the thesis",
            "studio_ranking",
            &["test".to_string()],
            Some("session-1"),
        )
        .unwrap();

        assert_eq!(pairs.len(), count_pairs(4));

        // First pair is rank 1 vs rank 2
        assert_eq!(pairs[0]["chosen"], "best output");
        assert_eq!(pairs[0]["rejected"], "second output");
        assert_eq!(pairs[0]["ranking_metadata"]["chosen_rank"], 1);
        assert_eq!(pairs[0]["ranking_metadata"]["rejected_rank"], 2);
        assert_eq!(pairs[0]["ranking_metadata"]["rank_margin"], 1);

        // Widest margin pair spans the full ranking
        let last = pairs.last().unwrap();
        assert_eq!(last["ranking_metadata"]["rank_margin"], 1);
        let widest = pairs
            .iter()
            .find(|p| p["ranking_metadata"]["rank_margin"] == 3)
            .unwrap();
        assert_eq!(widest["chosen"], "best output");
        assert_eq!(widest["rejected"], "worst output");
    }

    #[test]
    fn test_all_pairs_share_session() {
        let ranked: Vec<String> = ["x", "y", "z"].iter().map(|s| s.to_string()).collect();
        let outputs = outputs_of(&[("x", "1"), ("y", "2"), ("z", "3")]);
        let pairs =
            extract_pairwise_preferences(&ranked, &outputs, "p", "s", &[], None).unwrap();

        let session = pairs[0]["ranking_metadata"]["session_id"].as_str().unwrap();
        assert!(!session.is_empty());
        assert!(pairs
            .iter()
            .all(|p| p["ranking_metadata"]["session_id"] == session));
    }

    #[test]
    fn test_missing_output_is_error() {
        let ranked: Vec<String> = ["a", "missing"].iter().map(|s| s.to_string()).collect();
        let outputs = outputs_of(&[("a", "text")]);
        let err =
            extract_pairwise_preferences(&ranked, &outputs, "p", "s", &[], None).unwrap_err();
        assert!(matches!(err, AppraiseError::InvalidValue { .. }));
    }

    #[test]
    fn test_pairs_compose_with_reward_annotation() {
        use crate::config::RewardPolicy;
        use crate::reward::annotate_pair_with_rewards;

        let ranked: Vec<String> = ["good", "bad"].iter().map(|s| s.to_string()).collect();
        let outputs = outputs_of(&[
            (
                "good",
                "## Analysis\n\nRevenue grew because demand held, thus margins \
                 expanded.\n\n- Risk: churn\n- Risk: pricing",
            ),
            ("bad", "Fine."),
        ]);
        let pairs =
            extract_pairwise_preferences(&ranked, &outputs, "p", "s", &[], None).unwrap();
        let annotated =
            annotate_pair_with_rewards(&pairs[0], None, &RewardPolicy::default()).unwrap();

        assert!(annotated["chosen_score"].is_number());
        assert_eq!(annotated["mode"], "ranking");
    }
}
