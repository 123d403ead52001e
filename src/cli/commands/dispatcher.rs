//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::io::Write;

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::lookup::SitePackages;

use super::check::CheckCommand;
use super::inspect::InspectCommand;
use super::paths::PathsCommand;
use super::version::VersionCommand;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command, writing its report to `out`.
    fn execute(&self, source: &SitePackages, out: &mut dyn Write) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    source: SitePackages,
}

impl CommandDispatcher {
    /// Create a new dispatcher searching `source`.
    pub fn new(source: SitePackages) -> Self {
        Self { source }
    }

    /// The metadata source commands run against.
    pub fn source(&self) -> &SitePackages {
        &self.source
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, out: &mut dyn Write) -> Result<CommandResult> {
        match &cli.command {
            Commands::Check(args) => CheckCommand::new(args.clone()).execute(&self.source, out),
            Commands::Version(args) => {
                VersionCommand::new(args.clone()).execute(&self.source, out)
            }
            Commands::Inspect(args) => {
                InspectCommand::new(args.clone()).execute(&self.source, out)
            }
            Commands::Paths => PathsCommand.execute(&self.source, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(2);
        assert!(!result.success);
        assert_eq!(result.exit_code, 2);
    }

    #[test]
    fn dispatches_to_check() {
        let temp = TempDir::new().unwrap();
        let info = temp.path().join("packaging-24.0.dist-info");
        fs::create_dir_all(&info).unwrap();
        fs::write(info.join("METADATA"), "Name: packaging\nVersion: 24.0\n").unwrap();

        let dispatcher = CommandDispatcher::new(SitePackages::new([temp.path()]));
        let cli = Cli::parse_from(["optdeps", "check", "packaging"]);
        let mut out = Vec::new();

        let result = dispatcher.dispatch(&cli, &mut out).unwrap();
        assert_eq!(result, CommandResult::success());
        assert!(String::from_utf8(out).unwrap().contains("24.0"));
    }

    #[test]
    fn dispatches_to_paths() {
        let dispatcher = CommandDispatcher::new(SitePackages::new(["/somewhere"]));
        let cli = Cli::parse_from(["optdeps", "paths"]);
        let mut out = Vec::new();

        dispatcher.dispatch(&cli, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("/somewhere"));
    }
}
