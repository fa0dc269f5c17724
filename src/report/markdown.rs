// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Markdown report rendering.

use std::fmt::Write;

use crate::scoring::ScoredChange;

use super::Report;

/// Render the report as a Markdown document.
pub fn render(report: &Report) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Change Analysis Report\n");

    let _ = writeln!(out, "## Suggested Commit\n");
    let _ = writeln!(out, "```\n{}\n```\n", report.suggestion.format());

    let _ = writeln!(out, "## Summary\n");
    let _ = writeln!(
        out,
        "- **Files analyzed:** {} of {} detected",
        report.stats.files_analyzed, report.stats.files_detected
    );
    for (commit_type, count) in report.breakdown() {
        let _ = writeln!(out, "- **{}:** {}", commit_type, count);
    }
    let _ = writeln!(out);

    let breaking = report.breaking_changes();
    if !breaking.is_empty() {
        let _ = writeln!(out, "## Breaking Changes\n");
        for change in &breaking {
            let _ = writeln!(
                out,
                "- `{}`: {}",
                change.classified.semantic.context.raw.path, change.classified.description
            );
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "## Changes\n");
    for change in report.sorted_changes() {
        write_change(&mut out, change);
    }

    out
}

fn write_change(out: &mut String, change: &ScoredChange) {
    let classified = &change.classified;
    let raw = &classified.semantic.context.raw;

    let marker = if classified.breaking { " ⚠" } else { "" };
    let _ = writeln!(out, "### `{}`{}\n", raw.path, marker);
    let _ = writeln!(
        out,
        "- **Type:** {} | **Change:** {} | **Score:** {:.1}",
        classified.commit_type,
        raw.kind.as_str(),
        change.score
    );
    if let Some(scope) = &classified.commit_scope {
        let _ = writeln!(out, "- **Scope:** {}", scope);
    }
    let _ = writeln!(out, "- **Description:** {}", classified.description);
    if !classified.applied_rule_ids.is_empty() {
        let _ = writeln!(
            out,
            "- **Matched rules:** {}",
            classified.applied_rule_ids.join(", ")
        );
    }
    if !classified.semantic.deltas.is_empty() {
        let _ = writeln!(out, "- **Deltas:**");
        for delta in &classified.semantic.deltas {
            let _ = writeln!(out, "  - {} ({})", delta.description, delta.severity.as_str());
        }
    }
    let _ = writeln!(out);
}
