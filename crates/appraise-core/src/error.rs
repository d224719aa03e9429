//! Error types and exit codes for appraise
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args)
//! - 3: Data error (missing rubric/scenario, invalid rubric, etc.)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the appraise CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - missing or invalid input files (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during appraise operations
#[derive(Error, Debug)]
pub enum AppraiseError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("unknown report format: {0} (expected: json or markdown)")]
    UnknownReportFormat(String),

    #[error("{0}")]
    UsageError(String),

    // Data errors (exit code 3)
    #[error("evaluation module not found: {name}")]
    ModuleNotFound { name: String },

    #[error("scenario not found: {path:?}")]
    ScenarioNotFound { path: PathBuf },

    #[error("rubric not found: {path:?}")]
    RubricNotFound { path: PathBuf },

    #[error("golden answer not found: {path:?}")]
    GoldenAnswerNotFound { path: PathBuf },

    #[error("invalid rubric: {reason}")]
    InvalidRubric { reason: String },

    #[error("invalid preference pair: {reason}")]
    InvalidPair { reason: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl AppraiseError {
    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        AppraiseError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a failed operation
    pub fn failed_operation(operation: &str, error: impl std::fmt::Display) -> Self {
        AppraiseError::FailedOperation {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppraiseError::UnknownFormat(_)
            | AppraiseError::UnknownReportFormat(_)
            | AppraiseError::UsageError(_)
            | AppraiseError::InvalidValue { .. } => ExitCode::Usage,

            AppraiseError::ModuleNotFound { .. }
            | AppraiseError::ScenarioNotFound { .. }
            | AppraiseError::RubricNotFound { .. }
            | AppraiseError::GoldenAnswerNotFound { .. }
            | AppraiseError::InvalidRubric { .. }
            | AppraiseError::InvalidPair { .. } => ExitCode::Data,

            AppraiseError::Io(_)
            | AppraiseError::Yaml(_)
            | AppraiseError::Json(_)
            | AppraiseError::Toml(_)
            | AppraiseError::FailedOperation { .. }
            | AppraiseError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier used in JSON error envelopes
    fn error_type(&self) -> &'static str {
        match self {
            AppraiseError::UnknownFormat(_) => "unknown_format",
            AppraiseError::UnknownReportFormat(_) => "unknown_report_format",
            AppraiseError::UsageError(_) => "usage_error",
            AppraiseError::ModuleNotFound { .. } => "module_not_found",
            AppraiseError::ScenarioNotFound { .. } => "scenario_not_found",
            AppraiseError::RubricNotFound { .. } => "rubric_not_found",
            AppraiseError::GoldenAnswerNotFound { .. } => "golden_answer_not_found",
            AppraiseError::InvalidRubric { .. } => "invalid_rubric",
            AppraiseError::InvalidPair { .. } => "invalid_pair",
            AppraiseError::Io(_) => "io_error",
            AppraiseError::Yaml(_) => "yaml_error",
            AppraiseError::Json(_) => "json_error",
            AppraiseError::Toml(_) => "toml_error",
            AppraiseError::InvalidValue { .. } => "invalid_value",
            AppraiseError::FailedOperation { .. } => "failed_operation",
            AppraiseError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for appraise operations
pub type Result<T> = std::result::Result<T, AppraiseError>;
