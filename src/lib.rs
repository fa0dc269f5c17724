// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! clens - Commit Lens
//!
//! A git change classification pipeline: extracts changed files, correlates
//! them with their surrounding context, compares source surfaces, classifies
//! each change against configurable rules, scores its impact, and suggests a
//! conventional-commit message for the set.
//!
//! # Example
//!
//! ```no_run
//! use clens::pipeline::{run, AnalysisRequest};
//! use clens::report::ReportFormat;
//! use clens::rules::LoadedRules;
//! use std::path::Path;
//!
//! let report = run(
//!     Path::new("."),
//!     &AnalysisRequest::default(),
//!     LoadedRules::default(),
//! )
//! .unwrap();
//!
//! println!("{}", report.render(ReportFormat::Cli));
//! ```

// Module declarations
pub mod cli;
pub mod context;
pub mod error;
pub mod git;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod scoring;
pub mod semantic;

// Re-exports for convenience
pub use error::{ClensError, Result};
pub use report::{Report, ReportFormat};

/// Version information embedded at compile time.
pub mod version {
    /// The current version of clens.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// The git SHA at compile time (if available).
    pub const GIT_SHA: Option<&str> = option_env!("VERGEN_GIT_SHA");

    /// The git commit date at compile time (if available).
    pub const GIT_COMMIT_DATE: Option<&str> = option_env!("VERGEN_GIT_COMMIT_DATE");

    /// Get a formatted version string.
    pub fn version_string() -> String {
        match (GIT_SHA, GIT_COMMIT_DATE) {
            (Some(sha), Some(date)) => {
                format!("{} ({} {})", VERSION, &sha[..7.min(sha.len())], date)
            }
            (Some(sha), None) => {
                format!("{} ({})", VERSION, &sha[..7.min(sha.len())])
            }
            _ => VERSION.to_string(),
        }
    }
}
