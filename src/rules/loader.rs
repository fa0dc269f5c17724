// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rules file loading.
//!
//! The file is YAML: either a bare list of rules, or a document with
//! `rules:` and an optional `weights:` section. A missing or malformed
//! file falls back to the builtin default rules, never fatally.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::scoring::weights::ScoreWeights;

use super::builtin::builtin_rules;
use super::schema::Rule;

/// Rules file names to search for, in order of priority.
const RULES_FILES: &[&str] = &["clens.yml", ".clens.yml", ".config/clens.yml"];

/// The loaded rule set plus scoring weights, read once per run.
#[derive(Debug, Clone)]
pub struct LoadedRules {
    /// Rules in configured order.
    pub rules: Vec<Rule>,
    /// Scoring weights, defaulted unless the file overrides them.
    pub weights: ScoreWeights,
}

impl Default for LoadedRules {
    fn default() -> Self {
        Self {
            rules: builtin_rules(),
            weights: ScoreWeights::default(),
        }
    }
}

/// Accepted file shapes: a bare rule list, or a keyed document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RulesFileFormat {
    List(Vec<Rule>),
    Document {
        rules: Vec<Rule>,
        #[serde(default)]
        weights: ScoreWeights,
    },
}

/// Load rules from an explicit path or the default search locations.
///
/// Never fails: any problem is logged and the builtin rules are used.
pub fn load_rules(path: Option<&Path>) -> LoadedRules {
    let resolved = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_rules_file(),
    };

    let Some(rules_path) = resolved else {
        tracing::debug!("no rules file found, using builtin rules");
        return LoadedRules::default();
    };

    match load_rules_from(&rules_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::warn!(
                "falling back to builtin rules: {} ({})",
                e,
                rules_path.display()
            );
            LoadedRules::default()
        }
    }
}

/// Load and parse a specific rules file.
pub fn load_rules_from(path: &Path) -> Result<LoadedRules, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
        message: format!("Failed to read rules file: {}", e),
    })?;

    parse_rules(&content)
}

/// Parse rules from a YAML string.
pub fn parse_rules(content: &str) -> Result<LoadedRules, ConfigError> {
    let format: RulesFileFormat =
        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to parse YAML: {}", e),
        })?;

    let loaded = match format {
        RulesFileFormat::List(rules) => LoadedRules {
            rules,
            weights: ScoreWeights::default(),
        },
        RulesFileFormat::Document { rules, weights } => LoadedRules { rules, weights },
    };

    for rule in &loaded.rules {
        if rule.id.is_empty() {
            return Err(ConfigError::InvalidRule {
                rule_id: "<empty>".to_string(),
                message: "rule id must not be empty".to_string(),
            });
        }
    }

    Ok(loaded)
}

/// Find the rules file in the current directory, its parents, or the
/// user's configuration directories.
pub fn find_rules_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    find_rules_file_from(&current_dir)
}

/// Find the rules file starting from a specific directory.
pub fn find_rules_file_from(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        for name in RULES_FILES {
            let candidate = current.join(name);
            if candidate.exists() {
                return Some(candidate);
            }
        }
        if !current.pop() {
            break;
        }
    }

    if let Some(home) = dirs::home_dir() {
        for name in RULES_FILES {
            let candidate = home.join(name);
            if candidate.exists() {
                return Some(candidate);
            }
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let candidate = config_dir.join("clens").join("rules.yml");
        if candidate.exists() {
            return Some(candidate);
        }
    }

    None
}

/// Starter rules file written by `clens init`.
pub fn example_rules() -> &'static str {
    r#"# clens rules
#
# Rules are matched in order; the last applying rule with a `type` wins.
# Predicates: `match` (glob), `match_path` (substring), `match_ast`
# (scanned against semantic-delta descriptions), `heuristics` (marker
# phrases scanned against delta descriptions).

rules:
  - id: tests
    match: "**/*.{test,spec}.*"
    type: test

  - id: docs
    match: "**/*.md"
    type: docs

  - id: api-surface
    match_path: "src/api"
    match_ast: "removed export"
    type: fix

  - id: dto-narrowed
    heuristics:
      - if: "removed interface"
    type: fix

# Optional scoring weight overrides:
# weights:
#   breaking: 1.0
#   public_api: 1.0
#   feat: 1.0
#   fix: 1.0
#   file_size: 0.01
#   semantic_impact: 1.0
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::schema::CommitType;

    #[test]
    fn test_parse_bare_list() {
        let yaml = r#"
- id: tests
  match: "**/*.test.ts"
  type: test
- id: docs
  match_path: "docs/"
  type: docs
"#;
        let loaded = parse_rules(yaml).unwrap();
        assert_eq!(loaded.rules.len(), 2);
        assert_eq!(loaded.weights, ScoreWeights::default());
    }

    #[test]
    fn test_parse_document_with_weights() {
        let yaml = r#"
rules:
  - id: tests
    match: "**/*.test.ts"
    type: test
weights:
  breaking: 2.0
"#;
        let loaded = parse_rules(yaml).unwrap();
        assert_eq!(loaded.rules.len(), 1);
        assert_eq!(loaded.weights.breaking, 2.0);
        assert_eq!(loaded.weights.fix, 1.0);
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        assert!(parse_rules("rules: [not: closed").is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_builtin() {
        let loaded = load_rules(Some(Path::new("/no/such/clens.yml")));
        assert_eq!(loaded.rules.len(), 2);
        assert_eq!(loaded.rules[0].commit_type, Some(CommitType::Test));
    }

    #[test]
    fn test_example_rules_parse() {
        let loaded = parse_rules(example_rules()).unwrap();
        assert!(loaded.rules.len() >= 4);
    }

    #[test]
    fn test_empty_rule_id_rejected() {
        let yaml = "- id: \"\"\n  type: test\n";
        assert!(parse_rules(yaml).is_err());
    }
}
