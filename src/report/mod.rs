// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Report aggregation and rendering.
//!
//! Stage 6 of the pipeline: aggregates all scored changes into a single
//! report (JSON, Markdown, or condensed CLI text) and derives one
//! suggested conventional-commit message for the whole change set.

pub mod json;
pub mod markdown;
pub mod suggestion;
pub mod text;

pub use suggestion::{synthesize, CommitSuggestion};

use serde::Serialize;
use std::collections::BTreeMap;

use crate::scoring::ScoredChange;

/// Output format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Markdown,
    Cli,
}

/// How many files the run saw and how many made it through analysis.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct AnalysisStats {
    /// Changed files detected, including ones dropped as unreadable.
    pub files_detected: usize,
    /// Files that flowed through the full pipeline.
    pub files_analyzed: usize,
}

/// The aggregate analysis report.
#[derive(Debug, Clone)]
pub struct Report {
    /// Scored changes, in pipeline order.
    pub changes: Vec<ScoredChange>,
    /// The synthesized commit suggestion.
    pub suggestion: CommitSuggestion,
    /// Detection/analysis accounting.
    pub stats: AnalysisStats,
}

impl Report {
    /// Build a report, synthesizing the commit suggestion.
    pub fn new(changes: Vec<ScoredChange>, stats: AnalysisStats) -> Self {
        let suggestion = synthesize(&changes);
        Self {
            changes,
            suggestion,
            stats,
        }
    }

    /// Render the report in the requested format.
    pub fn render(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Json => json::render(self),
            ReportFormat::Markdown => markdown::render(self),
            ReportFormat::Cli => text::render(self),
        }
    }

    /// Changes sorted by descending score; ties keep pipeline order.
    pub fn sorted_changes(&self) -> Vec<&ScoredChange> {
        let mut sorted: Vec<&ScoredChange> = self.changes.iter().collect();
        sorted.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted
    }

    /// Count of changes per commit type, in type-name order.
    pub fn breakdown(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for change in &self.changes {
            *counts
                .entry(change.classified.commit_type.as_str())
                .or_insert(0) += 1;
        }
        counts
    }

    /// The breaking changes, in pipeline order.
    pub fn breaking_changes(&self) -> Vec<&ScoredChange> {
        self.changes
            .iter()
            .filter(|c| c.classified.breaking)
            .collect()
    }
}
