// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::report::ReportFormat;

/// clens - Commit Lens
///
/// Analyzes git changes and suggests conventional-commit messages.
#[derive(Parser, Debug)]
#[command(name = "clens")]
#[command(author = "Eshan Roy")]
#[command(version)]
#[command(about = "Git change classification and commit suggestion", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The command to run (defaults to analyze if not specified)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the repository (defaults to the current directory)
    #[arg(short = 'C', long, global = true)]
    pub repo: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,
}

impl Cli {
    /// The command to execute, defaulting to analyze.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Analyze(AnalyzeArgs::default()))
    }
}

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Condensed terminal output (default)
    #[default]
    Cli,
    /// JSON output for machine parsing
    Json,
    /// Markdown report
    Markdown,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Cli => ReportFormat::Cli,
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Markdown => ReportFormat::Markdown,
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Analyze changes and suggest a commit message (default command)
    Analyze(AnalyzeArgs),

    /// Write a starter rules file
    Init(InitArgs),

    /// Print version information
    Version,
}

/// Arguments for the analyze command.
#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Base reference to compare from
    #[arg(default_value = "HEAD^")]
    pub base: String,

    /// Head reference to compare to
    #[arg(default_value = "HEAD")]
    pub head: String,

    /// Compare the base reference against the working tree instead
    #[arg(short, long)]
    pub worktree: bool,

    /// Path to a rules file (overrides discovery)
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "cli")]
    pub format: OutputFormat,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            base: "HEAD^".to_string(),
            head: "HEAD".to_string(),
            worktree: false,
            rules: None,
            format: OutputFormat::Cli,
        }
    }
}

/// Arguments for the init command.
#[derive(Parser, Debug, Default, Clone)]
pub struct InitArgs {
    /// Overwrite an existing rules file
    #[arg(short, long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_analyze() {
        let cli = Cli::parse_from(["clens"]);
        assert!(matches!(cli.effective_command(), Commands::Analyze(_)));
    }

    #[test]
    fn test_analyze_defaults() {
        let cli = Cli::parse_from(["clens", "analyze"]);
        match cli.effective_command() {
            Commands::Analyze(args) => {
                assert_eq!(args.base, "HEAD^");
                assert_eq!(args.head, "HEAD");
                assert!(!args.worktree);
                assert_eq!(args.format, OutputFormat::Cli);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_analyze_refs_and_format() {
        let cli = Cli::parse_from(["clens", "analyze", "main", "feature", "--format", "json"]);
        match cli.effective_command() {
            Commands::Analyze(args) => {
                assert_eq!(args.base, "main");
                assert_eq!(args.head, "feature");
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_worktree_flag() {
        let cli = Cli::parse_from(["clens", "analyze", "--worktree"]);
        match cli.effective_command() {
            Commands::Analyze(args) => assert!(args.worktree),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
