//! Evaluation library: on-disk modules of scenarios, rubrics, and golden
//! answers
//!
//! Layout: `evals/<module>/{scenarios,rubrics,golden_answers}/`, with
//! scenarios and rubrics as YAML and golden answers as Markdown. A module's
//! README.md supplies its listing description.

pub mod runner;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{AppraiseError, Result};
use crate::rubric::{Dimension, Rubric};
use crate::scenario::Scenario;

/// Listing entry for one evaluation module
#[derive(Debug, Clone, Serialize)]
pub struct ModuleSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub scenario_count: usize,
}

/// Listing entry for one scenario
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSummary {
    pub id: String,
    pub title: String,
    pub category: String,
    pub difficulty: String,
    pub estimated_time_minutes: u32,
}

/// A directory tree of evaluation modules
pub struct EvalLibrary {
    evals_path: PathBuf,
}

impl EvalLibrary {
    /// Open the library rooted at `<base>/evals`
    pub fn new(base_path: &Path) -> Self {
        EvalLibrary {
            evals_path: base_path.join("evals"),
        }
    }

    /// Path to the library root
    pub fn root(&self) -> &Path {
        &self.evals_path
    }

    /// List all evaluation modules, sorted by directory name
    pub fn list_modules(&self) -> Result<Vec<ModuleSummary>> {
        let mut modules = Vec::new();
        if !self.evals_path.is_dir() {
            return Ok(modules);
        }

        let mut entries: Vec<PathBuf> = fs::read_dir(&self.evals_path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.is_dir()
                    && !p
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with('.'))
            })
            .collect();
        entries.sort();

        for module_dir in entries {
            let id = module_dir
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();

            modules.push(ModuleSummary {
                name: display_name(&id),
                description: read_description(&module_dir),
                scenario_count: yaml_files(&module_dir.join("scenarios")).len(),
                id,
            });
        }

        Ok(modules)
    }

    /// List the scenarios of one module. An unknown module lists as empty
    /// rather than erroring, matching how the CLI surfaces it.
    pub fn list_scenarios(&self, module: &str) -> Result<Vec<ScenarioSummary>> {
        let Some(module_dir) = self.find_module_dir(module) else {
            return Ok(Vec::new());
        };

        let mut scenarios = Vec::new();
        for path in yaml_files(&module_dir.join("scenarios")) {
            let content = fs::read_to_string(&path)?;
            let mut summary: ScenarioSummary =
                serde_yaml::from_str(&content).unwrap_or_default();
            if summary.id.is_empty() {
                summary.id = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or_default()
                    .to_string();
            }
            scenarios.push(summary);
        }

        Ok(scenarios)
    }

    /// Load a scenario definition
    pub fn load_scenario(&self, module: &str, scenario_name: &str) -> Result<Scenario> {
        let module_dir = self.module_dir(module)?;
        Scenario::load(&module_dir.join("scenarios").join(format!("{}.yaml", scenario_name)))
    }

    /// Load a rubric definition
    pub fn load_rubric(&self, module: &str, rubric_name: &str) -> Result<Rubric> {
        let module_dir = self.module_dir(module)?;
        Rubric::load(&module_dir.join("rubrics").join(format!("{}.yaml", rubric_name)))
    }

    /// Load a rubric, falling back to the built-in default when the module
    /// has no rubric by that name
    pub fn load_rubric_or_default(&self, module: &str, rubric_name: &str) -> Rubric {
        match self.load_rubric(module, rubric_name) {
            Ok(rubric) => rubric,
            Err(err) => {
                tracing::debug!(%module, %rubric_name, error = %err, "falling back to default rubric");
                default_rubric()
            }
        }
    }

    /// Load the golden answer for a scenario
    pub fn load_golden_answer(&self, module: &str, scenario_name: &str) -> Result<String> {
        let module_dir = self.module_dir(module)?;
        let path = module_dir
            .join("golden_answers")
            .join(format!("{}.md", scenario_name));
        if !path.exists() {
            return Err(AppraiseError::GoldenAnswerNotFound { path });
        }
        Ok(fs::read_to_string(&path)?)
    }

    fn module_dir(&self, module: &str) -> Result<PathBuf> {
        self.find_module_dir(module)
            .ok_or_else(|| AppraiseError::ModuleNotFound {
                name: module.to_string(),
            })
    }

    /// Find a module directory by exact name or substring
    fn find_module_dir(&self, module: &str) -> Option<PathBuf> {
        let entries = fs::read_dir(&self.evals_path).ok()?;
        let mut dirs: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        dirs.sort();

        dirs.into_iter().find(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| name == module || name.contains(module))
        })
    }
}

/// The rubric used when a module declares none
pub fn default_rubric() -> Rubric {
    let dimensions = [
        ("factual_accuracy", "Factual Accuracy", 0.30),
        ("analytical_rigor", "Analytical Rigor", 0.25),
        ("risk_assessment", "Risk Assessment", 0.20),
        ("evidence_quality", "Evidence Quality", 0.15),
        ("completeness", "Completeness", 0.10),
    ];
    Rubric {
        dimensions: dimensions
            .iter()
            .map(|(id, name, weight)| Dimension {
                id: id.to_string(),
                name: name.to_string(),
                weight: *weight,
            })
            .collect(),
        ..Rubric::default()
    }
}

fn display_name(id: &str) -> String {
    id.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// First non-heading line of the module README, truncated for listings
fn read_description(module_dir: &Path) -> String {
    let readme = module_dir.join("README.md");
    let Ok(content) = fs::read_to_string(readme) else {
        return String::new();
    };

    let description = content
        .lines()
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .unwrap_or("")
        .trim()
        .to_string();

    if description.chars().count() > 100 {
        let truncated: String = description.chars().take(100).collect();
        format!("{}...", truncated)
    } else {
        description
    }
}

fn yaml_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("yaml"))
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_module(root: &Path, module: &str) {
        let module_dir = root.join("evals").join(module);
        fs::create_dir_all(module_dir.join("scenarios")).unwrap();
        fs::create_dir_all(module_dir.join("rubrics")).unwrap();
        fs::create_dir_all(module_dir.join("golden_answers")).unwrap();

        fs::write(
            module_dir.join("README.md"),
            "# Equity Thesis\n\nGrade full investment theses against scenario facts.\n",
        )
        .unwrap();
        fs::write(
            module_dir.join("scenarios").join("biotech.yaml"),
            "id: biotech\ntitle: Biotech Catalyst\ncategory: equity\ndifficulty: advanced\n",
        )
        .unwrap();
        fs::write(
            module_dir.join("rubrics").join("standard.yaml"),
            "dimensions:\n  - id: completeness\n    name: Completeness\n    weight: 100\npass_threshold: 70\n",
        )
        .unwrap();
        fs::write(
            module_dir.join("golden_answers").join("biotech.md"),
            "The golden answer.",
        )
        .unwrap();
    }

    #[test]
    fn test_list_modules() {
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path(), "01_equity_thesis");

        let library = EvalLibrary::new(dir.path());
        let modules = library.list_modules().unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].id, "01_equity_thesis");
        assert_eq!(modules[0].name, "01 Equity Thesis");
        assert!(modules[0].description.contains("investment theses"));
        assert_eq!(modules[0].scenario_count, 1);
    }

    #[test]
    fn test_list_scenarios() {
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path(), "01_equity_thesis");

        let library = EvalLibrary::new(dir.path());
        let scenarios = library.list_scenarios("equity_thesis").unwrap();
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].id, "biotech");
        assert_eq!(scenarios[0].title, "Biotech Catalyst");
    }

    #[test]
    fn test_list_scenarios_unknown_module_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let library = EvalLibrary::new(dir.path());
        assert!(library.list_scenarios("nope").unwrap().is_empty());
    }

    #[test]
    fn test_module_lookup_by_substring() {
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path(), "01_equity_thesis");

        let library = EvalLibrary::new(dir.path());
        let scenario = library.load_scenario("equity", "biotech").unwrap();
        assert_eq!(scenario.id, "biotech");
    }

    #[test]
    fn test_load_rubric_and_golden_answer() {
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path(), "01_equity_thesis");

        let library = EvalLibrary::new(dir.path());
        let rubric = library.load_rubric("equity_thesis", "standard").unwrap();
        assert_eq!(rubric.dimensions[0].id, "completeness");

        let golden = library
            .load_golden_answer("equity_thesis", "biotech")
            .unwrap();
        assert_eq!(golden, "The golden answer.");
    }

    #[test]
    fn test_missing_module_errors() {
        let dir = tempfile::tempdir().unwrap();
        let library = EvalLibrary::new(dir.path());
        let err = library.load_scenario("missing", "x").unwrap_err();
        assert!(matches!(err, AppraiseError::ModuleNotFound { .. }));
    }

    #[test]
    fn test_rubric_fallback_to_default() {
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path(), "01_equity_thesis");

        let library = EvalLibrary::new(dir.path());
        let rubric = library.load_rubric_or_default("equity_thesis", "nonexistent");
        assert_eq!(rubric.dimensions.len(), 5);
        assert!((rubric.total_weight() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("equity_thesis"), "Equity Thesis");
        assert_eq!(display_name("risk"), "Risk");
    }
}
