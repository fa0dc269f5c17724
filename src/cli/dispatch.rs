// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Command dispatch and execution.

use std::path::PathBuf;

use crate::error::{Result, ResultExt};
use crate::pipeline::{self, AnalysisRequest};
use crate::rules::loader;

use super::args::{AnalyzeArgs, Cli, Commands, InitArgs};

/// Run the CLI with the given arguments.
pub fn run(cli: Cli) -> Result<()> {
    match cli.effective_command() {
        Commands::Analyze(args) => run_analyze(&cli, args),
        Commands::Init(args) => run_init(&cli, args),
        Commands::Version => run_version(),
    }
}

/// Run the analyze command.
fn run_analyze(cli: &Cli, args: AnalyzeArgs) -> Result<()> {
    tracing::debug!("Running analyze command with args: {:?}", args);

    let rules = loader::load_rules(args.rules.as_deref());

    let request = AnalysisRequest {
        base: args.base.clone(),
        head: if args.worktree {
            None
        } else {
            Some(args.head.clone())
        },
    };

    let report = pipeline::run(&repo_path(cli), &request, rules)?;
    print!("{}", report.render(args.format.into()));
    Ok(())
}

/// Run the init command.
fn run_init(cli: &Cli, args: InitArgs) -> Result<()> {
    tracing::debug!("Running init command");

    let target = repo_path(cli).join("clens.yml");
    if target.exists() && !args.force {
        println!("Rules file already exists: {}", target.display());
        println!("Use --force to overwrite.");
        return Ok(());
    }

    std::fs::write(&target, loader::example_rules())
        .context(format!("Failed to write {}", target.display()))?;
    println!("✓ Wrote starter rules file: {}", target.display());
    Ok(())
}

/// Run the version command.
fn run_version() -> Result<()> {
    println!("clens {}", crate::version::version_string());
    Ok(())
}

/// Resolve the repository path from the CLI arguments.
fn repo_path(cli: &Cli) -> PathBuf {
    cli.repo
        .clone()
        .unwrap_or_else(|| PathBuf::from("."))
}
