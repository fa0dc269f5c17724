// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rule and commit-type schema.

use serde::{Deserialize, Serialize};

/// The closed conventional-commit classification vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Refactor,
    Test,
    Chore,
}

impl CommitType {
    /// Get the lowercase string form used in commit messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Docs => "docs",
            CommitType::Refactor => "refactor",
            CommitType::Test => "test",
            CommitType::Chore => "chore",
        }
    }

    /// Priority for aggregate suggestion selection:
    /// `feat > fix > refactor > docs = test > chore`.
    pub fn priority(&self) -> u8 {
        match self {
            CommitType::Feat => 5,
            CommitType::Fix => 4,
            CommitType::Refactor => 3,
            CommitType::Docs | CommitType::Test => 2,
            CommitType::Chore => 1,
        }
    }

    /// All members of the closed vocabulary.
    pub fn all() -> [CommitType; 6] {
        [
            CommitType::Feat,
            CommitType::Fix,
            CommitType::Docs,
            CommitType::Refactor,
            CommitType::Test,
            CommitType::Chore,
        ]
    }
}

impl std::fmt::Display for CommitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named heuristic: a marker phrase scanned against delta descriptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleHeuristic {
    /// The marker phrase, matched case-insensitively.
    #[serde(rename = "if")]
    pub condition: String,
}

/// One classification rule, loaded from the YAML rules file.
///
/// A rule applies when any of its match predicates succeeds; the last
/// applying rule with a defined `type` wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    /// Unique identifier, recorded on every change the rule applies to.
    pub id: String,
    /// Glob matched against the file path.
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub match_glob: Option<String>,
    /// Substring matched against the file path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_path: Option<String>,
    /// String scanned against semantic-delta descriptions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_ast: Option<String>,
    /// Commit type assigned when the rule applies.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub commit_type: Option<CommitType>,
    /// Marker-phrase heuristics.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub heuristics: Vec<RuleHeuristic>,
}

impl Rule {
    /// Construct a rule with only a glob predicate and a type.
    pub fn glob(id: impl Into<String>, pattern: impl Into<String>, commit_type: CommitType) -> Self {
        Self {
            id: id.into(),
            match_glob: Some(pattern.into()),
            match_path: None,
            match_ast: None,
            commit_type: Some(commit_type),
            heuristics: Vec::new(),
        }
    }
}
