//! Score aggregation and pass/fail determination

use std::collections::BTreeMap;

use crate::rubric::{Rubric, WeightConvention};

/// Weighted average of dimension scores.
///
/// Dimensions present in the rubric but absent from the scores map are
/// skipped, not zeroed. An empty or zero-weight rubric yields 0.0. The
/// result is convention-independent: dividing by the weight total cancels
/// whichever scale the rubric uses.
pub fn calculate_overall_score(scores: &BTreeMap<String, f64>, rubric: &Rubric) -> f64 {
    let mut total = 0.0;
    let mut total_weight = 0.0;

    for dimension in &rubric.dimensions {
        if let Some(score) = scores.get(&dimension.id) {
            total += score * dimension.weight;
            total_weight += dimension.weight;
        }
    }

    if total_weight == 0.0 {
        return 0.0;
    }

    total / total_weight
}

/// Weighted total on the rubric's own scale, for callers that treat missing
/// dimensions as zero rather than skipping them.
///
/// Percentage rubrics divide the weighted sum by 100; fractional rubrics use
/// it raw. Both land on the 0-100 score scale.
pub fn weighted_total(scores: &BTreeMap<String, f64>, rubric: &Rubric) -> f64 {
    let sum: f64 = rubric
        .dimensions
        .iter()
        .map(|d| scores.get(&d.id).copied().unwrap_or(0.0) * d.weight)
        .sum();

    match rubric.weight_convention() {
        WeightConvention::Percentage => sum / 100.0,
        WeightConvention::Fraction => sum,
    }
}

/// Critical failures veto a pass unconditionally; otherwise the threshold
/// decides.
pub fn determine_pass_fail(
    overall_score: f64,
    critical_failures: &[String],
    pass_threshold: f64,
) -> bool {
    if !critical_failures.is_empty() {
        return false;
    }
    overall_score >= pass_threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::Dimension;

    fn rubric_of(weights: &[(&str, f64)]) -> Rubric {
        Rubric {
            dimensions: weights
                .iter()
                .map(|(id, w)| Dimension {
                    id: id.to_string(),
                    name: String::new(),
                    weight: *w,
                })
                .collect(),
            ..Rubric::default()
        }
    }

    fn scores_of(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries
            .iter()
            .map(|(id, s)| (id.to_string(), *s))
            .collect()
    }

    #[test]
    fn test_weighted_average() {
        let rubric = rubric_of(&[("a", 0.75), ("b", 0.25)]);
        let scores = scores_of(&[("a", 80.0), ("b", 40.0)]);
        assert!((calculate_overall_score(&scores, &rubric) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_weight_convention_equivalence() {
        // Fractional and percentage rubrics with the same relative weights
        // must produce identical overall scores
        let fractional = rubric_of(&[("a", 0.5), ("b", 0.5)]);
        let percentage = rubric_of(&[("a", 50.0), ("b", 50.0)]);
        let scores = scores_of(&[("a", 90.0), ("b", 70.0)]);

        let from_fraction = calculate_overall_score(&scores, &fractional);
        let from_percentage = calculate_overall_score(&scores, &percentage);
        assert!((from_fraction - from_percentage).abs() < 1e-9);
        assert!((from_fraction - 80.0).abs() < 1e-9);

        // The convention-aware total agrees as well
        let total_fraction = weighted_total(&scores, &fractional);
        let total_percentage = weighted_total(&scores, &percentage);
        assert!((total_fraction - total_percentage).abs() < 1e-9);
        assert!((total_fraction - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_dimensions_skipped_in_average() {
        let rubric = rubric_of(&[("a", 0.5), ("b", 0.5)]);
        let scores = scores_of(&[("a", 80.0)]);
        // "b" is skipped, not zeroed
        assert!((calculate_overall_score(&scores, &rubric) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_dimensions_zeroed_in_total() {
        let rubric = rubric_of(&[("a", 50.0), ("b", 50.0)]);
        let scores = scores_of(&[("a", 80.0)]);
        assert!((weighted_total(&scores, &rubric) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_rubric_is_zero_not_error() {
        let rubric = rubric_of(&[]);
        let scores = scores_of(&[("a", 100.0)]);
        assert_eq!(calculate_overall_score(&scores, &rubric), 0.0);
        assert_eq!(weighted_total(&scores, &rubric), 0.0);
    }

    #[test]
    fn test_critical_failure_vetoes_perfect_score() {
        let failures = vec!["Contains forward-looking guarantees".to_string()];
        assert!(!determine_pass_fail(100.0, &failures, 70.0));
    }

    #[test]
    fn test_pass_fail_threshold() {
        assert!(determine_pass_fail(70.0, &[], 70.0));
        assert!(!determine_pass_fail(69.9, &[], 70.0));
    }
}
