//! `appraise reward` command - composite reward signal for a text

use std::fs;
use std::path::Path;

use appraise_core::config::ScoringProfile;
use appraise_core::error::Result;
use appraise_core::reward::compute_reward;

use crate::cli::{Cli, OutputFormat};

/// Execute the reward command
pub fn execute(
    cli: &Cli,
    file: &Path,
    reference_path: Option<&Path>,
    profile: &ScoringProfile,
) -> Result<()> {
    let text = fs::read_to_string(file)?;
    let reference = match reference_path {
        Some(path) => Some(fs::read_to_string(path)?),
        None => None,
    };

    let signal = compute_reward(&text, "", reference.as_deref(), None, &profile.reward);
    let composite = signal.composite_with(&profile.reward.weights);

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&signal.to_json())?);
        }
        OutputFormat::Human => {
            println!("composite:      {:.4}", composite);
            println!("accuracy:       {:.4}", signal.accuracy);
            println!("logic:          {:.4}", signal.logic);
            println!("format_quality: {:.4}", signal.format_quality);
            println!("length:         {:.4}", signal.length);
            if !cli.quiet && reference.is_none() {
                println!("(no reference supplied; accuracy is neutral)");
            }
        }
    }

    Ok(())
}
