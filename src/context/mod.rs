// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Context correlation.
//!
//! Stage 2 of the pipeline: enriches each raw change with cross-file
//! relationships (related files by naming convention, dependency edges),
//! a coarse scope label, and the simplified whole-file hunk.

pub mod deps;
pub mod hunks;

pub use deps::{Dependency, DependencyGraph, DependencyKind};
pub use hunks::CodeHunk;

use serde::Serialize;

use crate::git::extract::{extension_of, is_test_path};
use crate::git::{FileType, RawChange};

/// Coarse scope label assigned by path matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeLabel {
    Test,
    Public,
    Internal,
    Docs,
    Example,
    Config,
    Unknown,
}

impl ScopeLabel {
    /// Get the lowercase string form used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeLabel::Test => "test",
            ScopeLabel::Public => "public",
            ScopeLabel::Internal => "internal",
            ScopeLabel::Docs => "docs",
            ScopeLabel::Example => "example",
            ScopeLabel::Config => "config",
            ScopeLabel::Unknown => "unknown",
        }
    }
}

/// A raw change enriched with cross-file context.
#[derive(Debug, Clone)]
pub struct ContextualizedChange {
    /// The underlying raw change.
    pub raw: RawChange,
    /// Likely companion files, guessed from naming conventions.
    pub related_files: Vec<String>,
    /// Dependency edges involving this file: its own declarations first,
    /// then edges from other changed files pointing at it.
    pub dependencies: Vec<Dependency>,
    /// Coarse scope label.
    pub scope: ScopeLabel,
    /// Simplified whole-file hunks (at most one).
    pub hunks: Vec<CodeHunk>,
}

/// Correlate a change set, building the dependency graph internally.
pub fn correlate(changes: Vec<RawChange>) -> Vec<ContextualizedChange> {
    let graph = DependencyGraph::build(&changes);
    correlate_with_graph(changes, &graph)
}

/// Correlate a change set against a precomputed dependency graph.
///
/// Output order matches input order; exactly one contextualized change per
/// raw change.
pub fn correlate_with_graph(
    changes: Vec<RawChange>,
    graph: &DependencyGraph,
) -> Vec<ContextualizedChange> {
    changes
        .into_iter()
        .map(|raw| {
            let mut dependencies = graph.dependencies_from(&raw.path);
            dependencies.extend(graph.dependents_of(&raw.path).iter().cloned());

            let related_files = related_files_for(&raw.path);
            let scope = scope_for(&raw);
            let hunks = hunks::extract_hunk(raw.old_content.as_deref(), raw.new_content.as_deref())
                .into_iter()
                .collect();

            ContextualizedChange {
                raw,
                related_files,
                dependencies,
                scope,
                hunks,
            }
        })
        .collect()
}

/// Guess companion files from naming conventions.
///
/// For an implementation file this suggests adjacent `.test`/`.spec` files
/// and a `tests/unit` sibling; for a test file it suggests the reverse
/// lookup. These are guesses, not verified existence checks.
pub fn related_files_for(path: &str) -> Vec<String> {
    let extension = extension_of(path);
    if extension.is_empty() || !deps::is_code_path(path) {
        return Vec::new();
    }

    let file_name = path.rsplit('/').next().unwrap_or(path);
    let directory = match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    };

    // Reverse lookup: strip the test marker to find the implementation.
    for marker in [".test.", ".spec."] {
        if let Some(idx) = file_name.find(marker) {
            let stem = &file_name[..idx];
            let implementation = if directory.is_empty() {
                format!("{}.{}", stem, extension)
            } else {
                format!("{}/{}.{}", directory, stem, extension)
            };
            return vec![implementation];
        }
    }

    let stem = match file_name.rfind('.') {
        Some(idx) => &file_name[..idx],
        None => file_name,
    };

    let mut related = Vec::new();
    for marker in ["test", "spec"] {
        if directory.is_empty() {
            related.push(format!("{}.{}.{}", stem, marker, extension));
        } else {
            related.push(format!("{}/{}.{}.{}", directory, stem, marker, extension));
        }
    }
    related.push(format!("tests/unit/{}.test.{}", stem, extension));
    related
}

/// Assign the scope label from a fixed precedence list. First match wins.
pub fn scope_for(change: &RawChange) -> ScopeLabel {
    let lower = change.path.to_lowercase();

    if is_test_path(&change.path) {
        return ScopeLabel::Test;
    }
    if lower.contains("public") || lower.contains("/api/") || lower.starts_with("api/") {
        return ScopeLabel::Public;
    }
    if lower.starts_with("src/") || lower.contains("/src/") || lower.contains("internal") {
        return ScopeLabel::Internal;
    }
    if change.metadata.file_type == FileType::Doc
        || lower.starts_with("docs/")
        || lower.contains("/docs/")
    {
        return ScopeLabel::Docs;
    }
    if lower.contains("example") || lower.contains("demo") {
        return ScopeLabel::Example;
    }
    if change.metadata.file_type == FileType::Config || lower.contains("config") {
        return ScopeLabel::Config;
    }
    ScopeLabel::Unknown
}
