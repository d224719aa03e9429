//! Evaluation runner: grade a submission against a module scenario and
//! write a structured report

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::ScoringProfile;
use crate::error::Result;
use crate::format::ReportFormat;
use crate::grading::{aggregate, GradingEngine};

use super::EvalLibrary;

/// Configuration for one evaluation run
#[derive(Debug, Clone)]
pub struct EvalConfig {
    pub module: String,
    pub scenario_name: String,
    pub rubric_name: String,
}

impl EvalConfig {
    pub fn new(module: impl Into<String>, scenario_name: impl Into<String>) -> Self {
        EvalConfig {
            module: module.into(),
            scenario_name: scenario_name.into(),
            rubric_name: "standard".to_string(),
        }
    }

    pub fn with_rubric(mut self, rubric_name: impl Into<String>) -> Self {
        self.rubric_name = rubric_name.into();
        self
    }
}

/// Result of one evaluation run
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResult {
    pub scenario_id: String,
    pub scenario_title: String,
    pub module: String,
    pub timestamp: DateTime<Utc>,
    pub overall_score: f64,
    pub passed: bool,
    pub dimension_scores: BTreeMap<String, f64>,
    pub critical_failures: Vec<String>,
    pub detailed_feedback: BTreeMap<String, String>,
}

/// Run a complete evaluation: load scenario and rubric, grade the
/// submission, and aggregate on the rubric's own weight scale.
pub fn run_evaluation(
    library: &EvalLibrary,
    config: &EvalConfig,
    submission: &str,
    profile: &ScoringProfile,
) -> Result<EvaluationResult> {
    let scenario = library.load_scenario(&config.module, &config.scenario_name)?;
    let rubric = library.load_rubric_or_default(&config.module, &config.rubric_name);

    tracing::debug!(
        module = %config.module,
        scenario = %config.scenario_name,
        dimensions = rubric.dimensions.len(),
        "run_evaluation"
    );

    let engine = GradingEngine::new(&rubric, profile);
    let (dimension_scores, critical_failures, detailed_feedback) =
        engine.grade(submission, &scenario);

    let overall_score = aggregate::weighted_total(&dimension_scores, &rubric);
    let passed = aggregate::determine_pass_fail(
        overall_score,
        &critical_failures,
        rubric.pass_threshold,
    );

    let scenario_id = if scenario.id.is_empty() {
        config.scenario_name.clone()
    } else {
        scenario.id
    };

    Ok(EvaluationResult {
        scenario_id,
        scenario_title: scenario.title,
        module: config.module.clone(),
        timestamp: Utc::now(),
        overall_score,
        passed,
        dimension_scores,
        critical_failures,
        detailed_feedback,
    })
}

/// Write an evaluation report and return its path.
///
/// File names combine module, slugged scenario id, and a UTC timestamp so
/// repeated runs never clobber each other.
pub fn generate_report(
    result: &EvaluationResult,
    output_dir: &Path,
    format: ReportFormat,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let stamp = result.timestamp.format("%Y%m%d_%H%M%S");
    let stem = format!(
        "{}_{}_{}",
        result.module,
        slug::slugify(&result.scenario_id),
        stamp
    );

    let path = match format {
        ReportFormat::Json => {
            let path = output_dir.join(format!("{}.json", stem));
            fs::write(&path, serde_json::to_string_pretty(result)?)?;
            path
        }
        ReportFormat::Markdown => {
            let path = output_dir.join(format!("{}.md", stem));
            fs::write(&path, render_markdown(result))?;
            path
        }
    };

    Ok(path)
}

fn render_markdown(result: &EvaluationResult) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "# Evaluation Report: {}\n\n",
        result.scenario_title
    ));
    out.push_str(&format!("**Module:** {}\n", result.module));
    out.push_str(&format!("**Scenario:** {}\n", result.scenario_id));
    out.push_str(&format!("**Timestamp:** {}\n", result.timestamp.to_rfc3339()));
    out.push_str(&format!(
        "**Overall Score:** {:.1}/100\n",
        result.overall_score
    ));
    out.push_str(&format!(
        "**Status:** {}\n\n",
        if result.passed { "PASS" } else { "FAIL" }
    ));

    out.push_str("## Dimension Scores\n\n");
    for (dim, score) in &result.dimension_scores {
        out.push_str(&format!("- **{}:** {:.1}\n", dim, score));
    }

    if !result.critical_failures.is_empty() {
        out.push_str("\n## Critical Failures\n\n");
        for failure in &result.critical_failures {
            out.push_str(&format!("- {}\n", failure));
        }
    }

    out.push_str("\n## Detailed Feedback\n\n");
    for (dim, feedback) in &result.detailed_feedback {
        out.push_str(&format!("### {}\n\n{}\n\n", dim, feedback));
    }

    out
}
