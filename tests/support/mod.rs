use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::{Path, PathBuf};

/// Get a Command for appraise
pub fn appraise() -> Command {
    cargo_bin_cmd!("appraise")
}

/// Write a single-dimension percentage rubric and return its path
#[allow(dead_code)]
pub fn write_completeness_rubric(dir: &Path) -> PathBuf {
    let path = dir.join("rubric.yaml");
    fs::write(
        &path,
        "dimensions:\n  - id: completeness\n    name: Completeness\n    weight: 100\npass_threshold: 70\n",
    )
    .unwrap();
    path
}

/// Write a submission that covers every required section and carries a
/// substantive risk section, so it grades as a clean pass
#[allow(dead_code)]
pub fn write_passing_submission(dir: &Path) -> PathBuf {
    let path = dir.join("submission.md");
    fs::write(
        &path,
        "# Thesis\n\nThe investment case rests on durable share gains. Valuation \
         supports the price target; position sizing stays inside limits and \
         the catalyst lands at the Q4 print.\n\n## Risks\n\nDownside scenarios \
         include margin compression, customer churn, and competitive pricing \
         pressure over the next four quarters.\n",
    )
    .unwrap();
    path
}

/// Write a minimal evals/ library with one module and one scenario
#[allow(dead_code)]
pub fn write_eval_library(root: &Path) {
    let module_dir = root.join("evals").join("01_equity_thesis");
    fs::create_dir_all(module_dir.join("scenarios")).unwrap();
    fs::create_dir_all(module_dir.join("rubrics")).unwrap();

    fs::write(
        module_dir.join("README.md"),
        "# Equity Thesis\n\nGrade full investment theses against scenario facts.\n",
    )
    .unwrap();
    fs::write(
        module_dir.join("scenarios").join("biotech.yaml"),
        "id: biotech\ntitle: Biotech Catalyst\ndifficulty: advanced\n",
    )
    .unwrap();
    fs::write(
        module_dir.join("rubrics").join("standard.yaml"),
        "dimensions:\n  - id: completeness\n    name: Completeness\n    weight: 100\npass_threshold: 70\n",
    )
    .unwrap();
}
