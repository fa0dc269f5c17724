// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Built-in default rules.
//!
//! Used whenever the rules file is absent or malformed: a test-file rule
//! and a docs-file rule. Everything else is handled by the engine's
//! fallback heuristics.

use super::schema::{CommitType, Rule};

/// The two builtin default rules.
pub fn builtin_rules() -> Vec<Rule> {
    vec![
        Rule::glob("builtin-tests", "**/*.{test,spec}.*", CommitType::Test),
        Rule::glob("builtin-docs", "**/*.md", CommitType::Docs),
    ]
}
