// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Import/export dependency graph construction.
//!
//! The correlator owns graph construction; later stages only read. The
//! graph is an explicit adjacency structure keyed by target path, so a
//! lookup answers "who depends on this file".

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::git::extract::extension_of;
use crate::git::RawChange;

lazy_static! {
    static ref IMPORT_RE: Regex = Regex::new(
        r#"(?m)^\s*import\s+(?:(\{[^}]*\})|(\*\s+as\s+\w+)|(\w+))?\s*(?:,\s*\{[^}]*\})?\s*(?:from\s+)?['"]([^'"]+)['"]"#
    )
    .expect("invalid import regex");
    static ref EXPORT_FROM_RE: Regex = Regex::new(
        r#"(?m)^\s*export\s+(?:(\{[^}]*\})|\*)\s*from\s+['"]([^'"]+)['"]"#
    )
    .expect("invalid re-export regex");
    static ref REQUIRE_RE: Regex =
        Regex::new(r#"require\(\s*['"]([^'"]+)['"]\s*\)"#).expect("invalid require regex");
}

/// Kind of dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Import,
    Export,
    Uses,
}

/// A directed dependency edge between two files.
#[derive(Debug, Clone, Serialize)]
pub struct Dependency {
    /// The file declaring the dependency.
    pub from: String,
    /// The resolved target path.
    pub to: String,
    /// Edge kind.
    pub kind: DependencyKind,
    /// Symbols named in the declaration, when listed.
    pub symbols: Vec<String>,
}

/// Adjacency structure: target path to the edges pointing at it.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    edges: BTreeMap<String, Vec<Dependency>>,
}

impl DependencyGraph {
    /// Build the graph from the new content of every code file in the set.
    pub fn build(changes: &[RawChange]) -> Self {
        let mut graph = Self::default();

        for change in changes {
            let content = match change.new_content.as_deref() {
                Some(c) => c,
                None => continue,
            };
            if !is_code_path(&change.path) {
                continue;
            }
            for dep in parse_dependencies(&change.path, content) {
                graph.edges.entry(dep.to.clone()).or_default().push(dep);
            }
        }

        graph
    }

    /// Edges pointing at the given target path.
    pub fn dependents_of(&self, target: &str) -> &[Dependency] {
        self.edges.get(target).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Edges declared by the given source path, in target order.
    pub fn dependencies_from(&self, source: &str) -> Vec<Dependency> {
        self.edges
            .values()
            .flatten()
            .filter(|d| d.from == source)
            .cloned()
            .collect()
    }

    /// Total number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}

/// Check whether a path is parseable source code.
pub fn is_code_path(path: &str) -> bool {
    matches!(
        extension_of(path).as_str(),
        "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs"
    )
}

/// Parse import/export/require declarations out of a file's content.
pub fn parse_dependencies(path: &str, content: &str) -> Vec<Dependency> {
    let mut deps = Vec::new();

    for captures in IMPORT_RE.captures_iter(content) {
        let specifier = &captures[4];
        if let Some(target) = resolve_specifier(path, specifier) {
            let symbols = captures
                .get(1)
                .map(|m| parse_symbol_list(m.as_str()))
                .or_else(|| captures.get(3).map(|m| vec![m.as_str().to_string()]))
                .unwrap_or_default();
            deps.push(Dependency {
                from: path.to_string(),
                to: target,
                kind: DependencyKind::Import,
                symbols,
            });
        }
    }

    for captures in EXPORT_FROM_RE.captures_iter(content) {
        let specifier = &captures[2];
        if let Some(target) = resolve_specifier(path, specifier) {
            let symbols = captures
                .get(1)
                .map(|m| parse_symbol_list(m.as_str()))
                .unwrap_or_default();
            deps.push(Dependency {
                from: path.to_string(),
                to: target,
                kind: DependencyKind::Export,
                symbols,
            });
        }
    }

    for captures in REQUIRE_RE.captures_iter(content) {
        if let Some(target) = resolve_specifier(path, &captures[1]) {
            deps.push(Dependency {
                from: path.to_string(),
                to: target,
                kind: DependencyKind::Uses,
                symbols: Vec::new(),
            });
        }
    }

    deps
}

/// Split a `{ A, B as C }` list into bare symbol names.
fn parse_symbol_list(braced: &str) -> Vec<String> {
    braced
        .trim_matches(|c| c == '{' || c == '}')
        .split(',')
        .map(|s| s.split_whitespace().next().unwrap_or("").to_string())
        .filter(|s| !s.is_empty() && s != "type")
        .collect()
}

/// Resolve a relative import specifier to a file-like path.
///
/// Extension inference only, no real module resolution: a bare specifier
/// inherits the importing file's extension. Package imports resolve to
/// `None` and produce no edge.
fn resolve_specifier(from: &str, specifier: &str) -> Option<String> {
    if !specifier.starts_with('.') {
        return None;
    }

    let base_dir = match from.rfind('/') {
        Some(idx) => &from[..idx],
        None => "",
    };

    let mut parts: Vec<&str> = base_dir.split('/').filter(|p| !p.is_empty()).collect();
    for segment in specifier.split('/') {
        match segment {
            "." | "" => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }

    let mut resolved = parts.join("/");
    if extension_of(&resolved).is_empty() {
        let inferred = extension_of(from);
        if !inferred.is_empty() {
            resolved.push('.');
            resolved.push_str(&inferred);
        }
    }

    Some(resolved)
}
