//! Command dispatch logic for appraise

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use appraise_core::config::ScoringProfile;
use appraise_core::error::{AppraiseError, Result};

use crate::cli::{Cli, Commands};
use crate::commands;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    // Determine the base directory for the evaluation library
    let root = cli
        .root
        .clone()
        .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let profile = load_profile(cli)?;

    if cli.verbose {
        eprintln!("resolve_root: {:?}", start.elapsed());
    }

    match &cli.command {
        None => Err(AppraiseError::UsageError(
            "no command specified (see --help)".to_string(),
        )),

        Some(Commands::Grade {
            submission,
            rubric,
            scenario,
        }) => commands::grade::execute(cli, submission, rubric, scenario.as_deref(), &profile),

        Some(Commands::Run {
            module,
            scenario,
            input,
            rubric,
            output_dir,
            report_format,
        }) => commands::run::execute(
            cli,
            &root,
            module,
            scenario,
            input,
            rubric,
            output_dir,
            *report_format,
            &profile,
        ),

        Some(Commands::List { module }) => {
            commands::list::execute(cli, &root, module.as_deref())
        }

        Some(Commands::Reward { file, reference }) => {
            commands::reward::execute(cli, file, reference.as_deref(), &profile)
        }

        Some(Commands::Annotate {
            pairs,
            reference,
            output,
        }) => commands::annotate::execute(
            cli,
            pairs,
            reference.as_deref(),
            output.as_deref(),
            &profile,
        ),
    }
}

/// Load the scoring profile named on the command line, or fall back to the
/// built-in defaults
fn load_profile(cli: &Cli) -> Result<ScoringProfile> {
    match &cli.profile {
        Some(path) => ScoringProfile::load(path),
        None => Ok(ScoringProfile::default()),
    }
}
