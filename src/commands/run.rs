//! `appraise run` command - run a library evaluation and write a report

use std::fs;
use std::path::Path;

use appraise_core::config::ScoringProfile;
use appraise_core::error::Result;
use appraise_core::evals::runner::{generate_report, run_evaluation, EvalConfig};
use appraise_core::evals::EvalLibrary;
use appraise_core::format::ReportFormat;

use crate::cli::{Cli, OutputFormat};

/// Execute the run command
#[allow(clippy::too_many_arguments)]
pub fn execute(
    cli: &Cli,
    root: &Path,
    module: &str,
    scenario: &str,
    input: &Path,
    rubric: &str,
    output_dir: &Path,
    report_format: ReportFormat,
    profile: &ScoringProfile,
) -> Result<()> {
    let submission = fs::read_to_string(input)?;
    let library = EvalLibrary::new(root);
    let config = EvalConfig::new(module, scenario).with_rubric(rubric);

    let result = run_evaluation(&library, &config, &submission, profile)?;
    let report_path = generate_report(&result, output_dir, report_format)?;

    match cli.format {
        OutputFormat::Json => {
            let mut json = serde_json::to_value(&result)?;
            if let Some(obj) = json.as_object_mut() {
                obj.insert(
                    "report_path".to_string(),
                    serde_json::json!(report_path.display().to_string()),
                );
            }
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Human => {
            println!(
                "{}/{}: {:.1}/100  [{}]",
                result.module,
                result.scenario_id,
                result.overall_score,
                if result.passed { "PASS" } else { "FAIL" }
            );

            if !result.critical_failures.is_empty() {
                println!("\nCritical Failures:");
                for failure in &result.critical_failures {
                    println!("  - {}", failure);
                }
            }

            if !cli.quiet {
                println!("\nReport saved to: {}", report_path.display());
            }
        }
    }

    Ok(())
}
