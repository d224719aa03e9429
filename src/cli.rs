//! CLI argument parsing for appraise
//!
//! Global flags: --format, --quiet, --verbose, --log-level, --log-json,
//! --profile, --root

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use appraise_core::format::{OutputFormat, ReportFormat};

/// Appraise - rubric-driven grading CLI for analyst text
#[derive(Parser, Debug)]
#[command(name = "appraise")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (human or json)
    #[arg(long, global = true, default_value = "human", value_parser = parse_output_format)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Verbose diagnostics
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Scoring profile TOML (defaults apply when omitted)
    #[arg(long, global = true, env = "APPRAISE_PROFILE")]
    pub profile: Option<PathBuf>,

    /// Base directory containing the evals/ library
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Grade a submission against a rubric
    Grade {
        /// Path to the submission text
        #[arg(long)]
        submission: PathBuf,

        /// Path to the rubric YAML
        #[arg(long)]
        rubric: PathBuf,

        /// Path to the scenario YAML (optional)
        #[arg(long)]
        scenario: Option<PathBuf>,
    },

    /// Run a full evaluation from the evals/ library and write a report
    Run {
        /// Evaluation module (name or substring)
        #[arg(long)]
        module: String,

        /// Scenario name
        #[arg(long)]
        scenario: String,

        /// Path to the submission text
        #[arg(long)]
        input: PathBuf,

        /// Rubric name within the module
        #[arg(long, default_value = "standard")]
        rubric: String,

        /// Directory for generated reports
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Report file format (json or markdown)
        #[arg(long, default_value = "json", value_parser = parse_report_format)]
        report_format: ReportFormat,
    },

    /// List evaluation modules, or the scenarios of one module
    List {
        /// Show scenarios for this module
        #[arg(long)]
        module: Option<String>,
    },

    /// Compute the composite reward signal for a text
    Reward {
        /// Path to the text to score
        file: PathBuf,

        /// Path to a reference answer for the accuracy axis
        #[arg(long)]
        reference: Option<PathBuf>,
    },

    /// Annotate preference pairs (JSONL) with reward scores
    Annotate {
        /// Path to a JSONL file of preference pairs
        #[arg(long)]
        pairs: PathBuf,

        /// Path to a reference answer for the accuracy axis
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Write annotated pairs here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Parse output format from string
fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    s.parse::<OutputFormat>().map_err(|e| e.to_string())
}

/// Parse report format from string
fn parse_report_format(s: &str) -> Result<ReportFormat, String> {
    s.parse::<ReportFormat>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_help() {
        let result = Cli::try_parse_from(["appraise", "--help"]);
        assert!(result.is_err()); // --help exits
    }

    #[test]
    fn test_parse_grade() {
        let cli = Cli::try_parse_from([
            "appraise",
            "grade",
            "--submission",
            "memo.md",
            "--rubric",
            "standard.yaml",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Grade { .. })));
        assert_eq!(cli.format, OutputFormat::Human);
    }

    #[test]
    fn test_parse_run_with_format() {
        let cli = Cli::try_parse_from([
            "appraise",
            "--format",
            "json",
            "run",
            "--module",
            "equity_thesis",
            "--scenario",
            "biotech",
            "--input",
            "out.md",
            "--report-format",
            "markdown",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Some(Commands::Run {
                report_format,
                rubric,
                ..
            }) => {
                assert_eq!(report_format, ReportFormat::Markdown);
                assert_eq!(rubric, "standard");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_format_rejected() {
        let result = Cli::try_parse_from(["appraise", "--format", "records", "list"]);
        assert!(result.is_err());
    }
}
