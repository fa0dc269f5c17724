// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Semantic delta types.

use serde::Serialize;

/// Ordinal risk classification of a semantic delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Breaking,
}

impl Severity {
    /// Get the lowercase string form used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Breaking => "breaking",
        }
    }
}

/// What kind of symbol-level change a delta describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaKind {
    MethodAdded,
    MethodRemoved,
    ParameterChanged,
    ReturnTypeChanged,
    InterfaceChanged,
    AccessModifierChanged,
    TypeChanged,
    DependencyChanged,
    ImplementationChanged,
    FileAdded,
    FileDeleted,
    FileRenamed,
}

impl DeltaKind {
    /// Get the snake_case string form used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeltaKind::MethodAdded => "method_added",
            DeltaKind::MethodRemoved => "method_removed",
            DeltaKind::ParameterChanged => "parameter_changed",
            DeltaKind::ReturnTypeChanged => "return_type_changed",
            DeltaKind::InterfaceChanged => "interface_changed",
            DeltaKind::AccessModifierChanged => "access_modifier_changed",
            DeltaKind::TypeChanged => "type_changed",
            DeltaKind::DependencyChanged => "dependency_changed",
            DeltaKind::ImplementationChanged => "implementation_changed",
            DeltaKind::FileAdded => "file_added",
            DeltaKind::FileDeleted => "file_deleted",
            DeltaKind::FileRenamed => "file_renamed",
        }
    }

    /// Per-kind contribution to the semantic-impact score factor.
    pub fn impact_points(&self) -> f64 {
        match self {
            DeltaKind::MethodRemoved
            | DeltaKind::ParameterChanged
            | DeltaKind::ReturnTypeChanged
            | DeltaKind::FileDeleted => 10.0,
            DeltaKind::InterfaceChanged | DeltaKind::AccessModifierChanged => 7.0,
            DeltaKind::MethodAdded | DeltaKind::FileAdded => 5.0,
            DeltaKind::TypeChanged | DeltaKind::DependencyChanged => 4.0,
            DeltaKind::ImplementationChanged | DeltaKind::FileRenamed => 2.0,
        }
    }
}

/// One atomic, typed description of a symbol-level change.
#[derive(Debug, Clone, Serialize)]
pub struct SemanticDelta {
    /// Kind of change.
    pub kind: DeltaKind,
    /// Human-readable description.
    pub description: String,
    /// Risk classification.
    pub severity: Severity,
}

impl SemanticDelta {
    /// Construct a delta.
    pub fn new(kind: DeltaKind, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            kind,
            description: description.into(),
            severity,
        }
    }
}

/// Per-file impact level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Minor,
    Moderate,
    Major,
}

impl Impact {
    /// Get the lowercase string form used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Minor => "minor",
            Impact::Moderate => "moderate",
            Impact::Major => "major",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Breaking > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_impact_points() {
        assert_eq!(DeltaKind::MethodRemoved.impact_points(), 10.0);
        assert_eq!(DeltaKind::InterfaceChanged.impact_points(), 7.0);
        assert_eq!(DeltaKind::MethodAdded.impact_points(), 5.0);
        assert_eq!(DeltaKind::DependencyChanged.impact_points(), 4.0);
        assert_eq!(DeltaKind::ImplementationChanged.impact_points(), 2.0);
    }

    #[test]
    fn test_impact_ordering() {
        assert!(Impact::Major > Impact::Moderate);
        assert!(Impact::Moderate > Impact::Minor);
    }
}
