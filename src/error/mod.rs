// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Error types for the clens application.
//!
//! The taxonomy follows the pipeline's propagation policy: only
//! [`RepositoryError`] is fatal; file access, parse, and configuration
//! failures are recovered locally so that one bad file never prevents a
//! report over the rest of the change set.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for clens operations.
#[derive(Error, Debug)]
pub enum ClensError {
    // Repository errors (fatal, abort the run)
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    // Per-file read/show errors (recovered, file dropped)
    #[error("File access error: {0}")]
    FileAccess(#[from] FileAccessError),

    // Source parsing errors (recovered, file keeps empty deltas)
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    // Rules configuration errors (recovered, builtin fallback)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

/// Fatal repository-level errors.
///
/// These abort the run before stage 1 produces output.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Not a git repository")]
    NotARepository,

    #[error("Failed to open repository: {message}")]
    OpenFailed { message: String },

    #[error("Invalid git reference: {reference}")]
    InvalidReference { reference: String },

    #[error("Failed to compute diff: {message}")]
    DiffFailed { message: String },

    #[error("Failed to read repository status: {message}")]
    StatusFailed { message: String },
}

/// Per-file read or content-lookup failures.
///
/// Recovered by the extractor: the file is skipped with a warning.
#[derive(Error, Debug)]
pub enum FileAccessError {
    #[error("Failed to read file: {path}")]
    ReadFailed { path: PathBuf },

    #[error("Failed to load content at ref '{reference}': {path}")]
    ShowFailed { path: PathBuf, reference: String },

    #[error("File is not valid text: {path}")]
    NotText { path: PathBuf },
}

/// Source surface-parsing failures.
///
/// Recovered by the semantic analyzer: the change flows through with an
/// empty delta list and still receives a default classification.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to parse source file: {path} - {message}")]
    SourceParse { path: PathBuf, message: String },

    #[error("Content is not valid UTF-8: {path}")]
    InvalidEncoding { path: PathBuf },
}

/// Rules configuration errors.
///
/// Recovered by falling back to the builtin default rules, never fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Rules file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to parse rules file: {message}")]
    ParseError { message: String },

    #[error("Invalid rule '{rule_id}': {message}")]
    InvalidRule { rule_id: String, message: String },
}

impl From<git2::Error> for RepositoryError {
    fn from(err: git2::Error) -> Self {
        RepositoryError::OpenFailed {
            message: err.message().to_string(),
        }
    }
}

/// Result type alias for clens operations.
pub type Result<T> = std::result::Result<T, ClensError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: std::error::Error + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ClensError::WithContext {
            context: context.into(),
            message: e.to_string(),
        })
    }
}
