//! Paths command implementation.
//!
//! The `optdeps paths` command prints the metadata search path, one
//! directory per line, in priority order.

use std::io::Write;

use crate::error::Result;
use crate::lookup::SitePackages;

use super::dispatcher::{Command, CommandResult};

/// The paths command implementation.
pub struct PathsCommand;

impl Command for PathsCommand {
    fn execute(&self, source: &SitePackages, out: &mut dyn Write) -> Result<CommandResult> {
        if source.paths().is_empty() {
            tracing::warn!("No search paths found; set OPTDEPS_PATH or VIRTUAL_ENV");
        }
        for path in source.paths() {
            writeln!(out, "{}", path.display())?;
        }
        Ok(CommandResult::success())
    }
}
