// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Scoring weights.
//!
//! Overridable from the `weights:` section of the rules file so CI can
//! tune priorities without recompiling. Defaults reproduce the tuned
//! behavior of the formula in [`crate::scoring`].

use serde::{Deserialize, Serialize};

/// Multipliers for the independent score factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Weight for the breaking-change factor (base contribution 10).
    pub breaking: f64,
    /// Weight for the public-API-scope factor (base contribution 8).
    pub public_api: f64,
    /// Weight for the `feat` commit-type factor (base contribution 6).
    pub feat: f64,
    /// Weight for the `fix` commit-type factor (base contribution 5).
    pub fix: f64,
    /// Weight applied to the capped changed-line count.
    pub file_size: f64,
    /// Weight for the aggregated semantic-delta factor.
    pub semantic_impact: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            breaking: 1.0,
            public_api: 1.0,
            feat: 1.0,
            fix: 1.0,
            // Line counts run to 1000; scale them into the same band as
            // the categorical factors.
            file_size: 0.01,
            semantic_impact: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = ScoreWeights::default();
        assert_eq!(weights.breaking, 1.0);
        assert_eq!(weights.file_size, 0.01);
    }

    #[test]
    fn test_partial_yaml_override() {
        let weights: ScoreWeights = serde_yaml::from_str("breaking: 2.5\n").unwrap();
        assert_eq!(weights.breaking, 2.5);
        assert_eq!(weights.feat, 1.0);
    }
}
