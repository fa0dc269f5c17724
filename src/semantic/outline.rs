// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Regex-based source surface parsing.
//!
//! Lists exported symbols and top-level declarations of a JavaScript or
//! TypeScript file. This is deliberately a surface parser: it answers
//! "which symbols does this file declare and export", not anything about
//! program semantics.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::error::ParseError;

lazy_static! {
    static ref CLASS_RE: Regex =
        Regex::new(r"(?m)^\s*(export\s+)?(?:default\s+)?(?:abstract\s+)?class\s+([A-Za-z_$][\w$]*)")
            .expect("invalid class regex");
    static ref INTERFACE_RE: Regex =
        Regex::new(r"(?m)^\s*(export\s+)?interface\s+([A-Za-z_$][\w$]*)")
            .expect("invalid interface regex");
    static ref FUNCTION_RE: Regex = Regex::new(
        r"(?m)^\s*(export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)"
    )
    .expect("invalid function regex");
    static ref ENUM_RE: Regex =
        Regex::new(r"(?m)^\s*(export\s+)?(?:const\s+)?enum\s+([A-Za-z_$][\w$]*)")
            .expect("invalid enum regex");
    static ref TYPE_RE: Regex =
        Regex::new(r"(?m)^\s*(export\s+)?type\s+([A-Za-z_$][\w$]*)\s*(?:<[^=]*>)?\s*=")
            .expect("invalid type regex");
    static ref VARIABLE_RE: Regex =
        Regex::new(r"(?m)^\s*(export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)")
            .expect("invalid variable regex");
    static ref EXPORT_LIST_RE: Regex =
        Regex::new(r"(?m)^\s*export\s*\{([^}]*)\}").expect("invalid export list regex");
    static ref EXPORT_DEFAULT_RE: Regex =
        Regex::new(r"(?m)^\s*export\s+default\b").expect("invalid export default regex");
}

/// Exported symbols and top-level declarations of one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceOutline {
    /// Symbols visible outside the module.
    pub exports: BTreeSet<String>,
    /// Top-level class names.
    pub classes: BTreeSet<String>,
    /// Top-level interface names.
    pub interfaces: BTreeSet<String>,
    /// Top-level function names.
    pub functions: BTreeSet<String>,
    /// Top-level enum names.
    pub enums: BTreeSet<String>,
    /// Top-level type alias names.
    pub type_aliases: BTreeSet<String>,
    /// Top-level `const`/`let`/`var` names.
    pub variables: BTreeSet<String>,
}

impl SourceOutline {
    /// Parse the surface of a source file.
    ///
    /// Fails only on content the regex engine cannot scan meaningfully
    /// (embedded NUL bytes mark undeclared binary data).
    pub fn parse(path: &str, content: &str) -> Result<Self, ParseError> {
        if content.contains('\0') {
            return Err(ParseError::SourceParse {
                path: PathBuf::from(path),
                message: "content contains NUL bytes".to_string(),
            });
        }

        let mut outline = Self::default();

        let tables: [(&Regex, fn(&mut Self) -> &mut BTreeSet<String>); 6] = [
            (&CLASS_RE, |o| &mut o.classes),
            (&INTERFACE_RE, |o| &mut o.interfaces),
            (&FUNCTION_RE, |o| &mut o.functions),
            (&ENUM_RE, |o| &mut o.enums),
            (&TYPE_RE, |o| &mut o.type_aliases),
            (&VARIABLE_RE, |o| &mut o.variables),
        ];

        for (regex, bucket) in tables {
            for captures in regex.captures_iter(content) {
                let name = captures[2].to_string();
                // `const enum X` also matches the variable pattern.
                if name == "enum" {
                    continue;
                }
                if captures.get(1).is_some() {
                    outline.exports.insert(name.clone());
                }
                bucket(&mut outline).insert(name);
            }
        }

        // `export { a, b as c }` lists, including re-exports.
        for captures in EXPORT_LIST_RE.captures_iter(content) {
            for entry in captures[1].split(',') {
                let name = entry.split_whitespace().next().unwrap_or("");
                if !name.is_empty() && name != "type" {
                    outline.exports.insert(name.to_string());
                }
            }
        }

        if EXPORT_DEFAULT_RE.is_match(content) {
            outline.exports.insert("default".to_string());
        }

        Ok(outline)
    }

    /// Union of all top-level declaration names.
    pub fn declarations(&self) -> BTreeSet<String> {
        let mut all = BTreeSet::new();
        for bucket in [
            &self.classes,
            &self.interfaces,
            &self.functions,
            &self.enums,
            &self.type_aliases,
            &self.variables,
        ] {
            all.extend(bucket.iter().cloned());
        }
        all
    }

    /// Whether the file exports anything.
    pub fn has_exports(&self) -> bool {
        !self.exports.is_empty()
    }

    /// Which declaration category a symbol belongs to, if known.
    pub fn category_of(&self, symbol: &str) -> Option<DeclarationCategory> {
        if self.interfaces.contains(symbol) {
            Some(DeclarationCategory::Interface)
        } else if self.type_aliases.contains(symbol) {
            Some(DeclarationCategory::TypeAlias)
        } else if self.enums.contains(symbol) {
            Some(DeclarationCategory::Enum)
        } else if self.classes.contains(symbol) {
            Some(DeclarationCategory::Class)
        } else if self.functions.contains(symbol) {
            Some(DeclarationCategory::Function)
        } else if self.variables.contains(symbol) {
            Some(DeclarationCategory::Variable)
        } else {
            None
        }
    }
}

/// Declaration categories distinguished by the surface parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationCategory {
    Class,
    Interface,
    Function,
    Enum,
    TypeAlias,
    Variable,
}
