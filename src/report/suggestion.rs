// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Commit suggestion synthesis.
//!
//! Derives one suggested conventional-commit message for the whole change
//! set. Internally the suggestion is always the `{ commit_type, breaking }`
//! pair; the `feat!`-style suffix only exists in the rendered header.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::rules::CommitType;
use crate::scoring::ScoredChange;

/// A suggested conventional-commit message for a change set.
#[derive(Debug, Clone, Serialize)]
pub struct CommitSuggestion {
    /// Aggregate commit type.
    pub commit_type: CommitType,
    /// Aggregate scope, omitted when ambiguous.
    pub scope: Option<String>,
    /// Subject line.
    pub subject: String,
    /// Optional body; carries the `BREAKING CHANGE:` section when set.
    pub body: Option<String>,
    /// Whether any change in the set is breaking.
    pub breaking: bool,
}

impl CommitSuggestion {
    /// Render the header line, e.g. `feat(auth)!: add login flow`.
    ///
    /// The `!` suffix is display-only serialization of the breaking flag.
    pub fn header(&self) -> String {
        let bang = if self.breaking { "!" } else { "" };
        match &self.scope {
            Some(scope) => format!("{}({}){}: {}", self.commit_type, scope, bang, self.subject),
            None => format!("{}{}: {}", self.commit_type, bang, self.subject),
        }
    }

    /// Render the full message: header plus body when present.
    pub fn format(&self) -> String {
        match &self.body {
            Some(body) => format!("{}\n\n{}", self.header(), body),
            None => self.header(),
        }
    }
}

/// Synthesize the aggregate suggestion for a scored change set.
pub fn synthesize(changes: &[ScoredChange]) -> CommitSuggestion {
    if changes.is_empty() {
        return CommitSuggestion {
            commit_type: CommitType::Chore,
            scope: None,
            subject: "no changes detected".to_string(),
            body: None,
            breaking: false,
        };
    }

    let commit_type = aggregate_type(changes);
    let scope = aggregate_scope(changes);
    let breaking = changes.iter().any(|c| c.classified.breaking);
    let subject = subject_for(commit_type, changes);
    let body = breaking_body(changes);

    CommitSuggestion {
        commit_type,
        scope,
        subject,
        body,
        breaking,
    }
}

/// Pick the highest-priority commit type present. Ties keep the first
/// occurrence in change order, so the result is deterministic.
fn aggregate_type(changes: &[ScoredChange]) -> CommitType {
    let mut best = changes[0].classified.commit_type;
    for change in &changes[1..] {
        if change.classified.commit_type.priority() > best.priority() {
            best = change.classified.commit_type;
        }
    }
    best
}

/// Pick the most frequent declared scope. The majority is measured over
/// the changes that declare a scope; unscoped changes do not dilute it.
/// Omitted when no scope covers more than half of the scoped changes, or
/// when more than three distinct scopes tie for the lead.
fn aggregate_scope(changes: &[ScoredChange]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut order: Vec<&str> = Vec::new();
    for change in changes {
        if let Some(scope) = change.classified.commit_scope.as_deref() {
            if !counts.contains_key(scope) {
                order.push(scope);
            }
            *counts.entry(scope).or_insert(0) += 1;
        }
    }

    if counts.is_empty() {
        return None;
    }

    let scoped_total: usize = counts.values().sum();
    let best_count = *counts.values().max().unwrap_or(&0);
    let leaders: Vec<&str> = order
        .iter()
        .filter(|s| counts[**s] == best_count)
        .copied()
        .collect();

    if best_count * 2 <= scoped_total || leaders.len() > 3 {
        return None;
    }

    Some(leaders[0].to_string())
}

/// Subject line: a single change speaks for itself; larger sets get a
/// type-specific sentence parameterized by the change count.
fn subject_for(commit_type: CommitType, changes: &[ScoredChange]) -> String {
    if changes.len() == 1 {
        return changes[0].classified.description.clone();
    }

    let count = changes.len();
    match commit_type {
        CommitType::Feat => format!("add new functionality across {} files", count),
        CommitType::Fix => format!("resolve issues across {} files", count),
        CommitType::Refactor => format!("restructure code across {} files", count),
        CommitType::Docs => format!("update documentation ({} files)", count),
        CommitType::Test => format!("update tests ({} files)", count),
        CommitType::Chore => format!("update {} files", count),
    }
}

/// Aggregate breaking-change descriptions under a `BREAKING CHANGE:`
/// marker, or `None` when nothing is breaking.
fn breaking_body(changes: &[ScoredChange]) -> Option<String> {
    let descriptions: Vec<&str> = changes
        .iter()
        .filter(|c| c.classified.breaking)
        .map(|c| c.classified.description.as_str())
        .collect();

    match descriptions.len() {
        0 => None,
        1 => Some(format!("BREAKING CHANGE: {}", descriptions[0])),
        _ => Some(format!(
            "BREAKING CHANGE:\n{}",
            descriptions
                .iter()
                .map(|d| format!("- {}", d))
                .collect::<Vec<_>>()
                .join("\n")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::correlate;
    use crate::git::extract::{classify_file_type, extension_of, ChangeMetadata};
    use crate::git::{ChangeKind, RawChange};
    use crate::rules::RuleEngine;
    use crate::scoring::{score_all, ScoreWeights};
    use crate::semantic::analyze;

    fn make_scored(specs: &[(&str, ChangeKind, Option<&str>, Option<&str>)]) -> Vec<ScoredChange> {
        let raws = specs
            .iter()
            .map(|(path, kind, old, new)| RawChange {
                path: path.to_string(),
                kind: *kind,
                old_path: None,
                old_content: old.map(|c| c.to_string()),
                new_content: new.map(|c| c.to_string()),
                metadata: ChangeMetadata {
                    lines_added: 1,
                    lines_removed: 0,
                    is_binary: false,
                    file_type: classify_file_type(path),
                    extension: extension_of(path),
                    directory: String::new(),
                },
            })
            .collect();
        let classified =
            RuleEngine::new(crate::rules::builtin_rules()).classify_all(analyze(correlate(raws)));
        score_all(classified, &ScoreWeights::default())
    }

    #[test]
    fn test_empty_set_suggestion() {
        let suggestion = synthesize(&[]);
        assert_eq!(suggestion.commit_type, CommitType::Chore);
        assert_eq!(suggestion.subject, "no changes detected");
        assert!(!suggestion.breaking);
        assert_eq!(suggestion.header(), "chore: no changes detected");
    }

    #[test]
    fn test_feat_outranks_fix() {
        let scored = make_scored(&[
            (
                "src/core/a.ts",
                ChangeKind::Modified,
                Some("export function a() { return 1; }\n"),
                Some("export function a() { return 2; }\n"),
            ),
            (
                "src/core/b.ts",
                ChangeKind::Added,
                None,
                Some("export const b = 1;\n"),
            ),
        ]);
        let suggestion = synthesize(&scored);
        assert_eq!(suggestion.commit_type, CommitType::Feat);
    }

    #[test]
    fn test_majority_scope_selected() {
        let scored = make_scored(&[
            (
                "src/auth/login.ts",
                ChangeKind::Modified,
                Some("const a = 1;\n"),
                Some("const a = 2;\n"),
            ),
            (
                "src/auth/logout.ts",
                ChangeKind::Modified,
                Some("const a = 1;\n"),
                Some("const a = 2;\n"),
            ),
            (
                "src/core/engine.ts",
                ChangeKind::Modified,
                Some("const a = 1;\n"),
                Some("const a = 2;\n"),
            ),
        ]);
        let suggestion = synthesize(&scored);
        assert_eq!(suggestion.scope.as_deref(), Some("auth"));
    }

    #[test]
    fn test_unscoped_changes_do_not_dilute_majority() {
        let scored = make_scored(&[
            (
                "src/auth/login.ts",
                ChangeKind::Modified,
                Some("const a = 1;\n"),
                Some("const a = 2;\n"),
            ),
            (
                "src/auth/logout.ts",
                ChangeKind::Modified,
                Some("const a = 1;\n"),
                Some("const a = 2;\n"),
            ),
            (
                "src/core/engine.ts",
                ChangeKind::Modified,
                Some("const a = 1;\n"),
                Some("const a = 2;\n"),
            ),
            (
                "scripts/build.sh",
                ChangeKind::Modified,
                Some("a\n"),
                Some("b\n"),
            ),
            (
                "scripts/deploy.sh",
                ChangeKind::Modified,
                Some("a\n"),
                Some("b\n"),
            ),
        ]);
        let suggestion = synthesize(&scored);

        // auth covers 2 of 3 scoped changes; the two scopeless script
        // files must not push the leader below the majority bar.
        assert_eq!(suggestion.scope.as_deref(), Some("auth"));
    }

    #[test]
    fn test_ambiguous_scope_omitted() {
        let scored = make_scored(&[
            (
                "src/auth/a.ts",
                ChangeKind::Modified,
                Some("const a = 1;\n"),
                Some("const a = 2;\n"),
            ),
            (
                "src/core/b.ts",
                ChangeKind::Modified,
                Some("const a = 1;\n"),
                Some("const a = 2;\n"),
            ),
        ]);
        let suggestion = synthesize(&scored);
        assert!(suggestion.scope.is_none());
    }

    #[test]
    fn test_breaking_body_aggregated() {
        let scored = make_scored(&[(
            "src/api/users.ts",
            ChangeKind::Modified,
            Some("export function getUserProfile() {}\nexport function keep() {}\n"),
            Some("export function keep() {}\n"),
        )]);
        let suggestion = synthesize(&scored);

        assert!(suggestion.breaking);
        assert!(suggestion.header().contains('!'));
        let body = suggestion.body.unwrap();
        assert!(body.starts_with("BREAKING CHANGE:"));
        assert!(body.contains("getUserProfile"));
    }

    #[test]
    fn test_single_change_subject_is_description() {
        let scored = make_scored(&[(
            "src/core/app.ts",
            ChangeKind::Modified,
            Some("export function a() { return 1; }\n"),
            Some("export function a() { return 2; }\n"),
        )]);
        let suggestion = synthesize(&scored);
        assert_eq!(suggestion.subject, "internal implementation changed");
    }

    #[test]
    fn test_multi_change_subject_counts_files() {
        let scored = make_scored(&[
            ("docs/a.md", ChangeKind::Modified, Some("a"), Some("b")),
            ("docs/b.md", ChangeKind::Modified, Some("a"), Some("b")),
        ]);
        let suggestion = synthesize(&scored);
        assert_eq!(suggestion.commit_type, CommitType::Docs);
        assert_eq!(suggestion.subject, "update documentation (2 files)");
    }
}
