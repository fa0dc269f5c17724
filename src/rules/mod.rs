// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rule loading and rule-based classification.

pub mod builtin;
pub mod engine;
pub mod loader;
pub mod schema;

pub use builtin::builtin_rules;
pub use engine::{ClassifiedChange, RuleEngine};
pub use loader::{load_rules, LoadedRules};
pub use schema::{CommitType, Rule, RuleHeuristic};
