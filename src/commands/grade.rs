//! `appraise grade` command - grade a submission file against a rubric

use std::fs;
use std::path::Path;

use appraise_core::config::ScoringProfile;
use appraise_core::error::Result;
use appraise_core::grading::{aggregate, GradingEngine, GradingResult};
use appraise_core::rubric::Rubric;
use appraise_core::scenario::Scenario;

use crate::cli::{Cli, OutputFormat};

/// Execute the grade command
pub fn execute(
    cli: &Cli,
    submission_path: &Path,
    rubric_path: &Path,
    scenario_path: Option<&Path>,
    profile: &ScoringProfile,
) -> Result<()> {
    let submission = fs::read_to_string(submission_path)?;
    let rubric = Rubric::load(rubric_path)?;
    let scenario = match scenario_path {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };

    let engine = GradingEngine::new(&rubric, profile);
    let (dimension_scores, critical_failures, detailed_feedback) =
        engine.grade(&submission, &scenario);

    let overall_score = aggregate::calculate_overall_score(&dimension_scores, &rubric);
    let passed =
        aggregate::determine_pass_fail(overall_score, &critical_failures, rubric.pass_threshold);

    let result = GradingResult {
        dimension_scores,
        critical_failures,
        detailed_feedback,
        overall_score,
        passed,
    };

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Human => print_human(cli, &result),
    }

    Ok(())
}

fn print_human(cli: &Cli, result: &GradingResult) {
    println!(
        "Overall Score: {:.1}/100  [{}]",
        result.overall_score,
        if result.passed { "PASS" } else { "FAIL" }
    );

    if !result.dimension_scores.is_empty() {
        println!("\nDimension Scores:");
        for (dim, score) in &result.dimension_scores {
            println!("  {:<24} {:>5.1}", dim, score);
        }
    }

    if !result.critical_failures.is_empty() {
        println!("\nCritical Failures:");
        for failure in &result.critical_failures {
            println!("  - {}", failure);
        }
    }

    if !cli.quiet && !result.detailed_feedback.is_empty() {
        println!("\nFeedback:");
        for (dim, feedback) in &result.detailed_feedback {
            println!("  {}: {}", dim, feedback);
        }
    }
}
