// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Semantic analysis.
//!
//! Stage 3 of the pipeline: parses old and new content into surface
//! outlines and derives symbol-level deltas, an impact level, and a
//! module-kind label per file. Non-code files pass through with an empty
//! delta list; parse failures are logged and the change flows on with
//! empty deltas so it still receives a default classification.

pub mod delta;
pub mod outline;

pub use delta::{DeltaKind, Impact, SemanticDelta, Severity};
pub use outline::{DeclarationCategory, SourceOutline};

use std::collections::BTreeSet;

use crate::context::deps::{is_code_path, parse_dependencies};
use crate::context::ContextualizedChange;
use crate::git::extract::{extension_of, is_test_path};
use crate::git::ChangeKind;

/// File-type label derived from which declaration categories are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    TestFile,
    InterfaceDefinition,
    TypeDefinition,
    EnumDefinition,
    ReactComponent,
    ClassModule,
    FunctionModule,
    Module,
}

impl ModuleKind {
    /// Get the human-readable label used in descriptions and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::TestFile => "test file",
            ModuleKind::InterfaceDefinition => "interface definition",
            ModuleKind::TypeDefinition => "type definition",
            ModuleKind::EnumDefinition => "enum definition",
            ModuleKind::ReactComponent => "React component",
            ModuleKind::ClassModule => "class module",
            ModuleKind::FunctionModule => "function module",
            ModuleKind::Module => "module",
        }
    }
}

/// A contextualized change enriched with symbol-level deltas.
#[derive(Debug, Clone)]
pub struct SemanticChange {
    /// The underlying contextualized change.
    pub context: ContextualizedChange,
    /// Symbol-level deltas, in derivation order.
    pub deltas: Vec<SemanticDelta>,
    /// Symbols named by any delta, sorted and de-duplicated.
    pub affected_symbols: Vec<String>,
    /// Per-file impact level.
    pub impact: Impact,
    /// Module-kind label.
    pub module_kind: ModuleKind,
}

impl SemanticChange {
    /// Whether any delta carries breaking severity.
    pub fn has_breaking_delta(&self) -> bool {
        self.deltas.iter().any(|d| d.severity == Severity::Breaking)
    }
}

/// Analyze a change set. Output order matches input order, one result per
/// input change.
pub fn analyze(changes: Vec<ContextualizedChange>) -> Vec<SemanticChange> {
    changes.into_iter().map(analyze_change).collect()
}

/// Analyze a single change.
fn analyze_change(context: ContextualizedChange) -> SemanticChange {
    let path = context.raw.path.clone();

    if !is_code_path(&path) {
        return SemanticChange {
            context,
            deltas: Vec::new(),
            affected_symbols: Vec::new(),
            impact: Impact::Minor,
            module_kind: ModuleKind::Module,
        };
    }

    let old_outline = parse_side(&path, context.raw.old_content.as_deref());
    let new_outline = parse_side(&path, context.raw.new_content.as_deref());

    let (deltas, impact) = match context.raw.kind {
        ChangeKind::Added => analyze_added(&path, new_outline.as_ref()),
        ChangeKind::Deleted => analyze_deleted(&path, old_outline.as_ref()),
        ChangeKind::Modified => analyze_modified(&context, old_outline.as_ref(), new_outline.as_ref()),
        ChangeKind::Renamed => analyze_renamed(&context, old_outline.as_ref(), new_outline.as_ref()),
    };

    let affected_symbols = collect_affected_symbols(
        old_outline.as_ref(),
        new_outline.as_ref(),
        context.raw.kind,
    );

    let module_kind = module_kind_for(
        &path,
        new_outline.as_ref().or(old_outline.as_ref()),
    );

    SemanticChange {
        context,
        deltas,
        affected_symbols,
        impact,
        module_kind,
    }
}

/// Parse one side of a change, logging and swallowing parse failures.
fn parse_side(path: &str, content: Option<&str>) -> Option<SourceOutline> {
    let content = content?;
    match SourceOutline::parse(path, content) {
        Ok(outline) => Some(outline),
        Err(e) => {
            tracing::warn!("parse failed, continuing with empty deltas: {}", e);
            None
        }
    }
}

/// Deltas and impact for an added file.
fn analyze_added(path: &str, outline: Option<&SourceOutline>) -> (Vec<SemanticDelta>, Impact) {
    let export_count = outline.map(|o| o.exports.len()).unwrap_or(0);
    let description = if export_count > 0 {
        format!("added file '{}' with {} exported symbols", path, export_count)
    } else {
        format!("added file '{}'", path)
    };

    let deltas = vec![SemanticDelta::new(
        DeltaKind::FileAdded,
        description,
        Severity::Low,
    )];
    let impact = if export_count > 0 {
        Impact::Moderate
    } else {
        Impact::Minor
    };
    (deltas, impact)
}

/// Deltas and impact for a deleted file.
fn analyze_deleted(path: &str, outline: Option<&SourceOutline>) -> (Vec<SemanticDelta>, Impact) {
    let had_exports = outline.map(SourceOutline::has_exports).unwrap_or(false);
    let (severity, impact) = if had_exports {
        (Severity::Breaking, Impact::Major)
    } else {
        (Severity::Medium, Impact::Moderate)
    };

    let deltas = vec![SemanticDelta::new(
        DeltaKind::FileDeleted,
        format!("deleted file '{}'", path),
        severity,
    )];
    (deltas, impact)
}

/// Deltas and impact for a renamed file; runs the modified-file comparison
/// when content also changed, with the rename delta prepended.
fn analyze_renamed(
    context: &ContextualizedChange,
    old_outline: Option<&SourceOutline>,
    new_outline: Option<&SourceOutline>,
) -> (Vec<SemanticDelta>, Impact) {
    let rename_delta = SemanticDelta::new(
        DeltaKind::FileRenamed,
        match &context.raw.old_path {
            Some(old) => format!("renamed file '{}' to '{}'", old, context.raw.path),
            None => format!("renamed file '{}'", context.raw.path),
        },
        Severity::Low,
    );

    let content_changed = context.raw.old_content.is_some()
        && context.raw.new_content.is_some()
        && context.raw.old_content != context.raw.new_content;

    if content_changed {
        let (mut deltas, impact) = analyze_modified(context, old_outline, new_outline);
        deltas.insert(0, rename_delta);
        (deltas, impact)
    } else {
        (vec![rename_delta], Impact::Minor)
    }
}

/// Deltas and impact for a modified file, from export/declaration set
/// differences between the two outlines.
fn analyze_modified(
    context: &ContextualizedChange,
    old_outline: Option<&SourceOutline>,
    new_outline: Option<&SourceOutline>,
) -> (Vec<SemanticDelta>, Impact) {
    let (old, new) = match (old_outline, new_outline) {
        (Some(old), Some(new)) => (old, new),
        // A parse failure on either side leaves the change with empty
        // deltas; it still receives a default classification downstream.
        _ => return (Vec::new(), Impact::Minor),
    };

    let mut deltas = Vec::new();

    let removed_exports: Vec<&String> = old.exports.difference(&new.exports).collect();
    let added_exports: Vec<&String> = new.exports.difference(&old.exports).collect();

    for symbol in &removed_exports {
        let kind = match old.category_of(symbol) {
            Some(DeclarationCategory::Interface) => DeltaKind::InterfaceChanged,
            Some(DeclarationCategory::TypeAlias) => DeltaKind::TypeChanged,
            _ => DeltaKind::MethodRemoved,
        };
        deltas.push(SemanticDelta::new(
            kind,
            format!("removed export '{}'", symbol),
            Severity::Breaking,
        ));
    }

    for symbol in &added_exports {
        let kind = match new.category_of(symbol) {
            Some(DeclarationCategory::Interface) => DeltaKind::InterfaceChanged,
            Some(DeclarationCategory::TypeAlias) => DeltaKind::TypeChanged,
            _ => DeltaKind::MethodAdded,
        };
        deltas.push(SemanticDelta::new(
            kind,
            format!("added export '{}'", symbol),
            Severity::Medium,
        ));
    }

    let old_declarations = old.declarations();
    let new_declarations = new.declarations();
    let removed_declarations: Vec<&String> = old_declarations
        .difference(&new_declarations)
        .filter(|s| !old.exports.contains(*s))
        .collect();
    let added_declarations: Vec<&String> = new_declarations
        .difference(&old_declarations)
        .filter(|s| !new.exports.contains(*s))
        .collect();

    for symbol in &removed_declarations {
        deltas.push(SemanticDelta::new(
            DeltaKind::ImplementationChanged,
            format!("removed declaration '{}'", symbol),
            Severity::Medium,
        ));
    }
    for symbol in &added_declarations {
        deltas.push(SemanticDelta::new(
            DeltaKind::ImplementationChanged,
            format!("added declaration '{}'", symbol),
            Severity::Low,
        ));
    }

    if let Some(delta) = import_delta(context) {
        deltas.push(delta);
    }

    if deltas.is_empty() && context.raw.old_content != context.raw.new_content {
        deltas.push(SemanticDelta::new(
            DeltaKind::ImplementationChanged,
            "internal implementation changed".to_string(),
            Severity::Low,
        ));
    }

    // Deterministic, ordered impact policy.
    let impact = if !removed_exports.is_empty() {
        Impact::Major
    } else if !added_exports.is_empty() || !removed_declarations.is_empty() {
        Impact::Moderate
    } else {
        Impact::Minor
    };

    (deltas, impact)
}

/// Detect changed import targets between the two sides.
fn import_delta(context: &ContextualizedChange) -> Option<SemanticDelta> {
    let old = context.raw.old_content.as_deref()?;
    let new = context.raw.new_content.as_deref()?;
    let path = &context.raw.path;

    let old_targets: BTreeSet<String> = parse_dependencies(path, old)
        .into_iter()
        .map(|d| d.to)
        .collect();
    let new_targets: BTreeSet<String> = parse_dependencies(path, new)
        .into_iter()
        .map(|d| d.to)
        .collect();

    if old_targets == new_targets {
        return None;
    }

    let added: Vec<&String> = new_targets.difference(&old_targets).collect();
    let removed: Vec<&String> = old_targets.difference(&new_targets).collect();

    let mut parts = Vec::new();
    if !added.is_empty() {
        parts.push(format!(
            "now imports {}",
            added
                .iter()
                .map(|t| format!("'{}'", t))
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    if !removed.is_empty() {
        parts.push(format!(
            "no longer imports {}",
            removed
                .iter()
                .map(|t| format!("'{}'", t))
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    Some(SemanticDelta::new(
        DeltaKind::DependencyChanged,
        parts.join("; "),
        Severity::Low,
    ))
}

/// Symbols involved in the change: the symmetric difference of exports and
/// declarations across the two sides.
fn collect_affected_symbols(
    old_outline: Option<&SourceOutline>,
    new_outline: Option<&SourceOutline>,
    kind: ChangeKind,
) -> Vec<String> {
    let empty = SourceOutline::default();
    let old = old_outline.unwrap_or(&empty);
    let new = new_outline.unwrap_or(&empty);

    let mut symbols: BTreeSet<String> = BTreeSet::new();
    match kind {
        ChangeKind::Added => symbols.extend(new.exports.iter().cloned()),
        ChangeKind::Deleted => symbols.extend(old.exports.iter().cloned()),
        ChangeKind::Modified | ChangeKind::Renamed => {
            let old_declarations = old.declarations();
            let new_declarations = new.declarations();
            symbols.extend(
                old_declarations
                    .symmetric_difference(&new_declarations)
                    .cloned(),
            );
            symbols.extend(old.exports.symmetric_difference(&new.exports).cloned());
        }
    }

    symbols.into_iter().collect()
}

/// Derive the module-kind label, tested in a fixed priority order. Tests
/// are detected by filename first.
pub fn module_kind_for(path: &str, outline: Option<&SourceOutline>) -> ModuleKind {
    if is_test_path(path) {
        return ModuleKind::TestFile;
    }

    let outline = match outline {
        Some(o) => o,
        None => return ModuleKind::Module,
    };

    let has_interfaces = !outline.interfaces.is_empty();
    let has_types = !outline.type_aliases.is_empty();
    let has_enums = !outline.enums.is_empty();
    let has_classes = !outline.classes.is_empty();
    let has_functions = !outline.functions.is_empty();

    if has_interfaces && !has_classes && !has_functions {
        return ModuleKind::InterfaceDefinition;
    }
    if has_types && !has_classes && !has_functions && !has_interfaces {
        return ModuleKind::TypeDefinition;
    }
    if has_enums && !has_classes && !has_functions && !has_interfaces && !has_types {
        return ModuleKind::EnumDefinition;
    }
    if matches!(extension_of(path).as_str(), "tsx" | "jsx") && (has_functions || has_classes) {
        return ModuleKind::ReactComponent;
    }
    if has_classes {
        return ModuleKind::ClassModule;
    }
    if has_functions {
        return ModuleKind::FunctionModule;
    }
    ModuleKind::Module
}
