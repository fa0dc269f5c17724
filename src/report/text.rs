// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Condensed CLI text rendering.

use std::fmt::Write;

use super::Report;

/// How many changes the condensed listing shows.
const TOP_CHANGES: usize = 5;

/// Render the report as short terminal-friendly text.
pub fn render(report: &Report) -> String {
    let mut out = String::new();

    if report.changes.is_empty() {
        let _ = writeln!(out, "No changes detected.");
        let _ = writeln!(out, "\nSuggested commit:\n  {}", report.suggestion.header());
        return out;
    }

    let _ = writeln!(
        out,
        "Analyzed {} of {} changed files.",
        report.stats.files_analyzed, report.stats.files_detected
    );

    let breakdown: Vec<String> = report
        .breakdown()
        .into_iter()
        .map(|(commit_type, count)| format!("{} {}", count, commit_type))
        .collect();
    let _ = writeln!(out, "Breakdown: {}", breakdown.join(", "));

    let breaking = report.breaking_changes();
    if !breaking.is_empty() {
        let _ = writeln!(out, "Breaking changes: {}", breaking.len());
    }

    let sorted = report.sorted_changes();
    let _ = writeln!(out, "\nTop changes:");
    for change in sorted.iter().take(TOP_CHANGES) {
        let classified = &change.classified;
        let marker = if classified.breaking { "!" } else { " " };
        let _ = writeln!(
            out,
            "  [{:>4.1}]{} {:<8} {}",
            change.score,
            marker,
            classified.commit_type.as_str(),
            classified.semantic.context.raw.path
        );
    }
    if sorted.len() > TOP_CHANGES {
        let _ = writeln!(out, "  ... and {} more", sorted.len() - TOP_CHANGES);
    }

    let _ = writeln!(out, "\nSuggested commit:");
    for line in report.suggestion.format().lines() {
        let _ = writeln!(out, "  {}", line);
    }

    out
}
