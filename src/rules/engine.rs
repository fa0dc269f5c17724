// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rule-based change classification.
//!
//! Stage 4 of the pipeline: matches each semantic change against the
//! ordered rule set. Every applying rule's id is recorded; the last
//! applying rule with a defined `type` wins. Changes no rule types fall
//! through to a fixed heuristic chain, so `commit_type` is always
//! assigned.

use globset::{GlobBuilder, GlobMatcher};

use crate::context::ScopeLabel;
use crate::git::extract::is_test_path;
use crate::git::{ChangeKind, FileType};
use crate::semantic::{DeltaKind, SemanticChange, Severity};

use super::schema::{CommitType, Rule};

/// A semantic change with an assigned classification.
#[derive(Debug, Clone)]
pub struct ClassifiedChange {
    /// The underlying semantic change.
    pub semantic: SemanticChange,
    /// Assigned commit type; defaults to `chore`, never absent.
    pub commit_type: CommitType,
    /// Inferred commit scope, when one can be named.
    pub commit_scope: Option<String>,
    /// Whether any semantic delta carries breaking severity.
    pub breaking: bool,
    /// Ids of every rule that applied, in rule order.
    pub applied_rule_ids: Vec<String>,
    /// Per-file description for reports and suggestions.
    pub description: String,
}

/// Rule engine holding the compiled, read-only rule set for one run.
pub struct RuleEngine {
    entries: Vec<(Rule, Option<GlobMatcher>)>,
}

impl RuleEngine {
    /// Compile a rule set. Invalid globs are logged and never match.
    pub fn new(rules: Vec<Rule>) -> Self {
        let entries = rules
            .into_iter()
            .map(|rule| {
                let matcher = rule.match_glob.as_deref().and_then(|pattern| {
                    match GlobBuilder::new(pattern).literal_separator(false).build() {
                        Ok(glob) => Some(glob.compile_matcher()),
                        Err(e) => {
                            tracing::warn!("ignoring invalid glob in rule '{}': {}", rule.id, e);
                            None
                        }
                    }
                });
                (rule, matcher)
            })
            .collect();
        Self { entries }
    }

    /// Classify a change set. Output order matches input order, one
    /// classified change per input change.
    pub fn classify_all(&self, changes: Vec<SemanticChange>) -> Vec<ClassifiedChange> {
        changes
            .into_iter()
            .map(|change| self.classify(change))
            .collect()
    }

    /// Classify a single change.
    pub fn classify(&self, semantic: SemanticChange) -> ClassifiedChange {
        let mut applied_rule_ids = Vec::new();
        let mut assigned_type: Option<CommitType> = None;

        for (rule, matcher) in &self.entries {
            if rule_applies(rule, matcher.as_ref(), &semantic) {
                applied_rule_ids.push(rule.id.clone());
                if let Some(commit_type) = rule.commit_type {
                    // Later rules override earlier ones.
                    assigned_type = Some(commit_type);
                }
            }
        }

        let commit_type = assigned_type.unwrap_or_else(|| fallback_type(&semantic));
        let breaking = semantic.has_breaking_delta();
        let commit_scope = infer_scope(&semantic);
        let description = describe(&semantic);

        ClassifiedChange {
            semantic,
            commit_type,
            commit_scope,
            breaking,
            applied_rule_ids,
            description,
        }
    }
}

/// A rule applies when any of its match predicates succeeds.
fn rule_applies(rule: &Rule, matcher: Option<&GlobMatcher>, change: &SemanticChange) -> bool {
    let path = &change.context.raw.path;

    if let Some(matcher) = matcher {
        if matcher.is_match(path) {
            return true;
        }
    }

    if let Some(substring) = &rule.match_path {
        if path.contains(substring.as_str()) {
            return true;
        }
    }

    if let Some(pattern) = &rule.match_ast {
        if descriptions_contain(change, pattern) {
            return true;
        }
    }

    rule.heuristics
        .iter()
        .any(|h| descriptions_contain(change, &h.condition))
}

/// Case-insensitive scan of a phrase against every delta description.
fn descriptions_contain(change: &SemanticChange, phrase: &str) -> bool {
    let needle = phrase.to_lowercase();
    change
        .deltas
        .iter()
        .any(|d| d.description.to_lowercase().contains(&needle))
}

/// Default-heuristic type assignment, applied in fixed order when no rule
/// assigns a type.
fn fallback_type(change: &SemanticChange) -> CommitType {
    let raw = &change.context.raw;

    if is_test_path(&raw.path) {
        return CommitType::Test;
    }
    if raw.metadata.file_type == FileType::Doc || raw.path.to_lowercase().contains("docs/") {
        return CommitType::Docs;
    }
    if raw.kind == ChangeKind::Added {
        return CommitType::Feat;
    }
    if change
        .deltas
        .iter()
        .any(|d| matches!(d.kind, DeltaKind::MethodAdded | DeltaKind::InterfaceChanged))
    {
        return CommitType::Feat;
    }
    if change.has_breaking_delta()
        || change
            .deltas
            .iter()
            .any(|d| d.kind == DeltaKind::ImplementationChanged)
    {
        return CommitType::Fix;
    }
    CommitType::Chore
}

/// Infer the commit scope from `src/<scope>/...` or `tests/<scope>/...`
/// path conventions, falling back to the correlator's scope label.
fn infer_scope(change: &SemanticChange) -> Option<String> {
    let parts: Vec<&str> = change.context.raw.path.split('/').collect();
    if parts.len() >= 3 && matches!(parts[0], "src" | "tests" | "test") {
        return Some(parts[1].to_string());
    }

    match change.context.scope {
        ScopeLabel::Unknown => None,
        label => Some(label.as_str().to_string()),
    }
}

/// Per-file description: the single delta's text when there is exactly
/// one, otherwise a generic sentence keyed by change kind.
fn describe(change: &SemanticChange) -> String {
    if change.deltas.len() == 1 {
        return change.deltas[0].description.clone();
    }

    let path = &change.context.raw.path;
    match change.context.raw.kind {
        ChangeKind::Added => format!("add {}", path),
        ChangeKind::Deleted => format!("remove {}", path),
        ChangeKind::Modified => format!("update {}", path),
        ChangeKind::Renamed => format!("rename {}", path),
    }
}

/// Check that a change carries one of the six closed commit types.
pub fn is_classified(change: &ClassifiedChange) -> bool {
    CommitType::all().contains(&change.commit_type)
}
