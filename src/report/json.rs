// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! JSON report rendering.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::scoring::{ScoreFactor, ScoredChange};
use crate::semantic::SemanticDelta;

use super::{CommitSuggestion, Report};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    summary: JsonSummary<'a>,
    suggested_commit: JsonSuggestion<'a>,
    changes: Vec<JsonChange<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary<'a> {
    total_changes: usize,
    files_detected: usize,
    files_analyzed: usize,
    breakdown: BTreeMap<&'a str, usize>,
    breaking_changes: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSuggestion<'a> {
    header: String,
    message: String,
    #[serde(rename = "type")]
    commit_type: &'a str,
    scope: Option<&'a str>,
    subject: &'a str,
    breaking: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonChange<'a> {
    path: &'a str,
    change_kind: &'a str,
    #[serde(rename = "type")]
    commit_type: &'a str,
    scope: Option<&'a str>,
    breaking: bool,
    score: f64,
    description: &'a str,
    applied_rules: &'a [String],
    deltas: &'a [SemanticDelta],
    score_factors: &'a [ScoreFactor],
}

/// Render the report as pretty-printed JSON.
pub fn render(report: &Report) -> String {
    let doc = JsonReport {
        summary: JsonSummary {
            total_changes: report.changes.len(),
            files_detected: report.stats.files_detected,
            files_analyzed: report.stats.files_analyzed,
            breakdown: report.breakdown(),
            breaking_changes: report.breaking_changes().len(),
        },
        suggested_commit: suggestion_view(&report.suggestion),
        changes: report
            .sorted_changes()
            .into_iter()
            .map(change_view)
            .collect(),
    };

    // Serialization of this shape cannot fail.
    serde_json::to_string_pretty(&doc).unwrap_or_else(|_| "{}".to_string())
}

fn suggestion_view(suggestion: &CommitSuggestion) -> JsonSuggestion<'_> {
    JsonSuggestion {
        header: suggestion.header(),
        message: suggestion.format(),
        commit_type: suggestion.commit_type.as_str(),
        scope: suggestion.scope.as_deref(),
        subject: &suggestion.subject,
        breaking: suggestion.breaking,
    }
}

fn change_view(change: &ScoredChange) -> JsonChange<'_> {
    let classified = &change.classified;
    let raw = &classified.semantic.context.raw;
    JsonChange {
        path: &raw.path,
        change_kind: raw.kind.as_str(),
        commit_type: classified.commit_type.as_str(),
        scope: classified.commit_scope.as_deref(),
        breaking: classified.breaking,
        score: change.score,
        description: &classified.description,
        applied_rules: &classified.applied_rule_ids,
        deltas: &classified.semantic.deltas,
        score_factors: &change.score_factors,
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::sample_report;

    #[test]
    fn test_json_shape() {
        let rendered = super::render(&sample_report());
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(parsed["summary"]["totalChanges"], 2);
        assert_eq!(parsed["summary"]["filesDetected"], 3);
        assert_eq!(parsed["summary"]["filesAnalyzed"], 2);
        assert_eq!(parsed["summary"]["breakingChanges"], 1);
        assert!(parsed["suggestedCommit"]["header"]
            .as_str()
            .unwrap()
            .contains('!'));
        assert_eq!(parsed["changes"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_changes_sorted_by_score() {
        let rendered = super::render(&sample_report());
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let changes = parsed["changes"].as_array().unwrap();
        let first = changes[0]["score"].as_f64().unwrap();
        let second = changes[1]["score"].as_f64().unwrap();
        assert!(first >= second);
    }
}
