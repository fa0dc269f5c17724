// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Pipeline orchestration.
//!
//! Runs the six stages in order over a repository: extraction,
//! context correlation, semantic analysis, rule classification,
//! scoring, and report synthesis. Per-file problems degrade (logged,
//! file skipped or analyzed shallowly); only repository-level failures
//! abort the run.

use std::path::Path;

use tracing::{debug, info};

use crate::context::correlate;
use crate::error::Result;
use crate::git::{extract, Repository};
use crate::report::{AnalysisStats, Report};
use crate::rules::{LoadedRules, RuleEngine};
use crate::scoring::score_all;
use crate::semantic::analyze;

/// What to compare during extraction.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Base reference, e.g. `HEAD^` or a branch name.
    pub base: String,
    /// Head reference; `None` compares the base against the working
    /// tree, untracked files included.
    pub head: Option<String>,
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        Self {
            base: "HEAD".to_string(),
            head: None,
        }
    }
}

/// Run the full pipeline against the repository containing `path`.
pub fn run(path: &Path, request: &AnalysisRequest, rules: LoadedRules) -> Result<Report> {
    let repo = Repository::open(path)?;
    run_in_repo(&repo, request, rules)
}

/// Run the full pipeline against an already-open repository.
pub fn run_in_repo(
    repo: &Repository,
    request: &AnalysisRequest,
    rules: LoadedRules,
) -> Result<Report> {
    let extraction = extract(repo, &request.base, request.head.as_deref())?;
    info!(
        detected = extraction.files_detected,
        skipped = extraction.files_skipped,
        "change extraction complete"
    );

    let stats = AnalysisStats {
        files_detected: extraction.files_detected,
        files_analyzed: extraction.changes.len(),
    };

    let contextualized = correlate(extraction.changes);
    debug!(changes = contextualized.len(), "context correlation complete");

    let semantic = analyze(contextualized);
    let engine = RuleEngine::new(rules.rules);
    let classified = engine.classify_all(semantic);
    let scored = score_all(classified, &rules.weights);
    debug!(changes = scored.len(), "classification and scoring complete");

    Ok(Report::new(scored, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn init_repo(dir: &Path) -> git2::Repository {
        let repo = git2::Repository::init(dir).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }
        repo
    }

    fn commit_all(repo: &git2::Repository, message: &str) {
        let mut index = repo.index().unwrap();
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = repo.signature().unwrap();
        let parent = repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap();
    }

    #[test]
    fn test_worktree_pipeline_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());
        fs::write(dir.path().join("base.ts"), "export const a = 1;\n").unwrap();
        commit_all(&repo, "initial");

        fs::write(
            dir.path().join("feature.ts"),
            "export function added() {}\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.md"), "# Notes\n").unwrap();

        let report = run(dir.path(), &AnalysisRequest::default(), LoadedRules::default()).unwrap();

        assert_eq!(report.changes.len(), 2);
        assert_eq!(report.stats.files_detected, 2);
        assert_eq!(report.stats.files_analyzed, 2);
        let paths: Vec<&str> = report
            .changes
            .iter()
            .map(|c| c.classified.semantic.context.raw.path.as_str())
            .collect();
        assert_eq!(paths, vec!["feature.ts", "notes.md"]);
    }

    #[test]
    fn test_ref_to_ref_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());
        fs::write(
            dir.path().join("api.ts"),
            "export function old() {}\nexport function keep() {}\n",
        )
        .unwrap();
        commit_all(&repo, "initial");
        fs::write(dir.path().join("api.ts"), "export function keep() {}\n").unwrap();
        commit_all(&repo, "remove old export");

        let request = AnalysisRequest {
            base: "HEAD^".to_string(),
            head: Some("HEAD".to_string()),
        };
        let report = run(dir.path(), &request, LoadedRules::default()).unwrap();

        assert_eq!(report.changes.len(), 1);
        assert!(report.changes[0].classified.breaking);
        assert!(report.suggestion.breaking);
    }

    #[test]
    fn test_not_a_repository_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(dir.path(), &AnalysisRequest::default(), LoadedRules::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());
        fs::write(dir.path().join("one.ts"), "export const a = 1;\n").unwrap();
        commit_all(&repo, "initial");
        fs::write(dir.path().join("one.ts"), "export const a = 2;\n").unwrap();
        fs::write(dir.path().join("two.ts"), "export const b = 1;\n").unwrap();

        let first = run(dir.path(), &AnalysisRequest::default(), LoadedRules::default()).unwrap();
        let second = run(dir.path(), &AnalysisRequest::default(), LoadedRules::default()).unwrap();

        assert_eq!(
            first.render(crate::report::ReportFormat::Json),
            second.render(crate::report::ReportFormat::Json)
        );
    }
}
