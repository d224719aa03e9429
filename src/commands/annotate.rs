//! `appraise annotate` command - add reward scores to preference pairs
//!
//! Input is JSONL: one preference pair object per line, each with at least
//! `chosen` and `rejected` text fields. All other keys pass through.

use std::fs;
use std::path::Path;

use appraise_core::config::ScoringProfile;
use appraise_core::error::Result;
use appraise_core::reward::annotate_pair_with_rewards;

use crate::cli::{Cli, OutputFormat};

/// Execute the annotate command
pub fn execute(
    cli: &Cli,
    pairs_path: &Path,
    reference_path: Option<&Path>,
    output_path: Option<&Path>,
    profile: &ScoringProfile,
) -> Result<()> {
    let content = fs::read_to_string(pairs_path)?;
    let reference = match reference_path {
        Some(path) => Some(fs::read_to_string(path)?),
        None => None,
    };

    let mut annotated_lines = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let pair: serde_json::Value = serde_json::from_str(line)?;
        let annotated =
            annotate_pair_with_rewards(&pair, reference.as_deref(), &profile.reward)?;
        annotated_lines.push(serde_json::to_string(&annotated)?);
    }

    let count = annotated_lines.len();
    let body = annotated_lines.join("\n");

    match output_path {
        Some(path) => {
            fs::write(path, format!("{}\n", body))?;
            if cli.format == OutputFormat::Human && !cli.quiet {
                println!("Annotated {} pairs -> {}", count, path.display());
            }
        }
        None => {
            println!("{}", body);
        }
    }

    tracing::debug!(pairs = count, "annotate_complete");

    Ok(())
}
