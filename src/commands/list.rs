//! `appraise list` command - list evaluation modules and scenarios

use std::path::Path;

use appraise_core::error::Result;
use appraise_core::evals::EvalLibrary;

use crate::cli::{Cli, OutputFormat};

/// Execute the list command
pub fn execute(cli: &Cli, root: &Path, module: Option<&str>) -> Result<()> {
    let library = EvalLibrary::new(root);

    match module {
        Some(module) => list_scenarios(cli, &library, module),
        None => list_modules(cli, &library),
    }
}

fn list_modules(cli: &Cli, library: &EvalLibrary) -> Result<()> {
    let modules = library.list_modules()?;

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&modules)?);
        }
        OutputFormat::Human => {
            if modules.is_empty() {
                if !cli.quiet {
                    println!("No evaluation modules found in {:?}", library.root());
                }
                return Ok(());
            }

            for m in &modules {
                println!("{:<30} ({} scenarios)", m.id, m.scenario_count);
                if !m.description.is_empty() {
                    println!("    {}", m.description);
                }
            }
        }
    }

    Ok(())
}

fn list_scenarios(cli: &Cli, library: &EvalLibrary, module: &str) -> Result<()> {
    let scenarios = library.list_scenarios(module)?;

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&scenarios)?);
        }
        OutputFormat::Human => {
            if scenarios.is_empty() {
                if !cli.quiet {
                    println!("No scenarios found for module '{}'", module);
                }
                return Ok(());
            }

            for s in &scenarios {
                let difficulty = if s.difficulty.is_empty() {
                    "-".to_string()
                } else {
                    s.difficulty.clone()
                };
                println!("{:<30} {:<40} [{}]", s.id, s.title, difficulty);
            }
        }
    }

    Ok(())
}
