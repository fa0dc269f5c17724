// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Impact scoring.
//!
//! Stage 5 of the pipeline: computes a weighted numeric priority per
//! change with an additive-then-multiplicative formula, normalized into
//! [0, 10]. Every factor contribution is retained for auditability; the
//! breakdown is reproducible byte-for-byte given identical inputs and
//! weights.

pub mod weights;

pub use weights::ScoreWeights;

use serde::Serialize;

use crate::context::ScopeLabel;
use crate::git::{ChangeKind, FileType};
use crate::rules::{ClassifiedChange, CommitType};
use crate::semantic::Severity;

/// Changed lines beyond this count no longer raise the score.
const FILE_SIZE_CAP: usize = 1000;

/// The semantic-impact factor saturates at this value.
const SEMANTIC_IMPACT_CAP: f64 = 20.0;

/// One recorded contribution to a change's score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreFactor {
    /// Factor name.
    pub name: &'static str,
    /// Unweighted factor value.
    pub value: f64,
    /// Weight the value was multiplied by.
    pub weight: f64,
}

/// A classified change with its computed priority score.
#[derive(Debug, Clone)]
pub struct ScoredChange {
    /// The underlying classified change.
    pub classified: ClassifiedChange,
    /// Normalized priority in [0, 10]. Derived once, never mutated.
    pub score: f64,
    /// Factor breakdown, in computation order.
    pub score_factors: Vec<ScoreFactor>,
}

/// Score a change set. Output order matches input order.
pub fn score_all(changes: Vec<ClassifiedChange>, weights: &ScoreWeights) -> Vec<ScoredChange> {
    changes
        .into_iter()
        .map(|change| score_change(change, weights))
        .collect()
}

/// Score a single change.
pub fn score_change(classified: ClassifiedChange, weights: &ScoreWeights) -> ScoredChange {
    let mut factors = Vec::new();
    let mut raw_score = 0.0;

    if classified.breaking {
        raw_score += 10.0 * weights.breaking;
        factors.push(ScoreFactor {
            name: "breaking",
            value: 10.0,
            weight: weights.breaking,
        });
    }

    if classified.semantic.context.scope == ScopeLabel::Public {
        raw_score += 8.0 * weights.public_api;
        factors.push(ScoreFactor {
            name: "public_api",
            value: 8.0,
            weight: weights.public_api,
        });
    }

    match classified.commit_type {
        CommitType::Feat => {
            raw_score += 6.0 * weights.feat;
            factors.push(ScoreFactor {
                name: "feat",
                value: 6.0,
                weight: weights.feat,
            });
        }
        CommitType::Fix => {
            raw_score += 5.0 * weights.fix;
            factors.push(ScoreFactor {
                name: "fix",
                value: 5.0,
                weight: weights.fix,
            });
        }
        _ => {}
    }

    let metadata = &classified.semantic.context.raw.metadata;
    let changed_lines = (metadata.lines_added + metadata.lines_removed).min(FILE_SIZE_CAP) as f64;
    raw_score += changed_lines * weights.file_size;
    factors.push(ScoreFactor {
        name: "file_size",
        value: changed_lines,
        weight: weights.file_size,
    });

    if !classified.semantic.deltas.is_empty() {
        let impact = semantic_impact(&classified);
        raw_score += impact * weights.semantic_impact;
        factors.push(ScoreFactor {
            name: "semantic_impact",
            value: impact,
            weight: weights.semantic_impact,
        });
    }

    let type_multiplier = file_type_multiplier(metadata.file_type);
    raw_score *= type_multiplier;
    factors.push(ScoreFactor {
        name: "file_type_multiplier",
        value: type_multiplier,
        weight: 1.0,
    });

    let kind_multiplier = change_kind_multiplier(classified.semantic.context.raw.kind);
    raw_score *= kind_multiplier;
    factors.push(ScoreFactor {
        name: "change_kind_multiplier",
        value: kind_multiplier,
        weight: 1.0,
    });

    let score = (raw_score / 10.0).clamp(0.0, 10.0);

    ScoredChange {
        classified,
        score,
        score_factors: factors,
    }
}

/// Sum per-delta-kind contributions plus a severity bonus, capped.
fn semantic_impact(classified: &ClassifiedChange) -> f64 {
    let mut total = 0.0;
    for delta in &classified.semantic.deltas {
        total += delta.kind.impact_points();
        if matches!(delta.severity, Severity::Breaking | Severity::High) {
            total += 3.0;
        }
    }
    total.min(SEMANTIC_IMPACT_CAP)
}

/// File-type score multiplier.
fn file_type_multiplier(file_type: FileType) -> f64 {
    match file_type {
        FileType::Test => 0.5,
        FileType::Config => 0.7,
        FileType::Doc => 0.3,
        _ => 1.0,
    }
}

/// Change-kind score multiplier.
fn change_kind_multiplier(kind: ChangeKind) -> f64 {
    match kind {
        ChangeKind::Added => 0.8,
        ChangeKind::Modified => 1.0,
        ChangeKind::Deleted => 1.2,
        ChangeKind::Renamed => 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::correlate;
    use crate::git::extract::{classify_file_type, extension_of, ChangeMetadata};
    use crate::git::RawChange;
    use crate::rules::RuleEngine;
    use crate::semantic::analyze;

    fn make_classified(
        path: &str,
        kind: ChangeKind,
        old: Option<&str>,
        new: Option<&str>,
    ) -> ClassifiedChange {
        let (lines_added, lines_removed) = {
            let old_lines = old.map(|c| c.lines().count()).unwrap_or(0);
            let new_lines = new.map(|c| c.lines().count()).unwrap_or(0);
            if new_lines >= old_lines {
                (new_lines - old_lines, 0)
            } else {
                (0, old_lines - new_lines)
            }
        };
        let raw = RawChange {
            path: path.to_string(),
            kind,
            old_path: None,
            old_content: old.map(|c| c.to_string()),
            new_content: new.map(|c| c.to_string()),
            metadata: ChangeMetadata {
                lines_added,
                lines_removed,
                is_binary: false,
                file_type: classify_file_type(path),
                extension: extension_of(path),
                directory: String::new(),
            },
        };
        let semantic = analyze(correlate(vec![raw])).remove(0);
        RuleEngine::new(crate::rules::builtin_rules()).classify(semantic)
    }

    #[test]
    fn test_score_bounds() {
        let classified = make_classified(
            "src/api/core.ts",
            ChangeKind::Modified,
            Some("export function a() {}\nexport function b() {}\n"),
            Some("export function c() {}\n"),
        );
        let scored = score_change(classified, &ScoreWeights::default());
        assert!(scored.score >= 0.0 && scored.score <= 10.0);
    }

    #[test]
    fn test_breaking_public_change_scores_high() {
        let breaking = make_classified(
            "src/api/users.ts",
            ChangeKind::Modified,
            Some("export function getUser() {}\nexport function keep() {}\n"),
            Some("export function keep() {}\n"),
        );
        let harmless = make_classified(
            "src/api/users.ts",
            ChangeKind::Modified,
            Some("export function keep() { return 1; }\n"),
            Some("export function keep() { return 2; }\n"),
        );

        let weights = ScoreWeights::default();
        let breaking_score = score_change(breaking, &weights).score;
        let harmless_score = score_change(harmless, &weights).score;
        assert!(breaking_score > harmless_score);
    }

    #[test]
    fn test_test_file_multiplier_halves_score() {
        let scored = score_change(
            make_classified(
                "src/app.test.ts",
                ChangeKind::Modified,
                Some("it('a');\n"),
                Some("it('a');\nit('b');\n"),
            ),
            &ScoreWeights::default(),
        );
        assert!(scored
            .score_factors
            .iter()
            .any(|f| f.name == "file_type_multiplier" && f.value == 0.5));
        assert!(scored.score < 2.0);
        assert!(!scored.classified.breaking);
    }

    #[test]
    fn test_factors_are_deterministic() {
        let weights = ScoreWeights::default();
        let first = score_change(
            make_classified(
                "src/core/engine.ts",
                ChangeKind::Modified,
                Some("export function a() {}\n"),
                Some("export function a() {}\nexport function b() {}\n"),
            ),
            &weights,
        );
        let second = score_change(
            make_classified(
                "src/core/engine.ts",
                ChangeKind::Modified,
                Some("export function a() {}\n"),
                Some("export function a() {}\nexport function b() {}\n"),
            ),
            &weights,
        );
        assert_eq!(first.score, second.score);
        assert_eq!(first.score_factors, second.score_factors);
    }

    #[test]
    fn test_file_size_capped() {
        let big_content: String = (0..5000).map(|i| format!("const x{} = {};\n", i, i)).collect();
        let classified = make_classified(
            "src/core/generated.ts",
            ChangeKind::Added,
            None,
            Some(&big_content),
        );
        let scored = score_change(classified, &ScoreWeights::default());
        let size_factor = scored
            .score_factors
            .iter()
            .find(|f| f.name == "file_size")
            .unwrap();
        assert_eq!(size_factor.value, 1000.0);
        assert!(scored.score <= 10.0);
    }

    #[test]
    fn test_deleted_kind_multiplier() {
        let scored = score_change(
            make_classified(
                "src/core/old.ts",
                ChangeKind::Deleted,
                Some("export function gone() {}\n"),
                None,
            ),
            &ScoreWeights::default(),
        );
        assert!(scored
            .score_factors
            .iter()
            .any(|f| f.name == "change_kind_multiplier" && f.value == 1.2));
        assert!(scored.classified.breaking);
    }
}
