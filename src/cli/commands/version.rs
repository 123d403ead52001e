//! Version command implementation.
//!
//! The `optdeps version` command prints the installed version of one
//! package, failing with `NotInstalled` when it is absent.

use std::io::Write;

use crate::cli::args::VersionArgs;
use crate::error::Result;
use crate::lookup::SitePackages;
use crate::registry::OptionalDependencies;

use super::dispatcher::{Command, CommandResult};

/// The version command implementation.
pub struct VersionCommand {
    args: VersionArgs,
}

impl VersionCommand {
    /// Create a new version command.
    pub fn new(args: VersionArgs) -> Self {
        Self { args }
    }
}

impl Command for VersionCommand {
    fn execute(&self, source: &SitePackages, out: &mut dyn Write) -> Result<CommandResult> {
        let deps = OptionalDependencies::declare(source.clone(), [&self.args.name])?;
        let version = deps.version(&self.args.name)?;
        writeln!(out, "{}", version)?;
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OptDepsError;
    use std::fs;
    use tempfile::TempDir;

    fn execute(name: &str, site: &TempDir) -> Result<String> {
        let cmd = VersionCommand::new(VersionArgs {
            name: name.to_string(),
        });
        let mut out = Vec::new();
        cmd.execute(&SitePackages::new([site.path()]), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn prints_normalized_version() {
        let temp = TempDir::new().unwrap();
        let info = temp.path().join("PyYAML-6.0.1.dist-info");
        fs::create_dir_all(&info).unwrap();
        fs::write(info.join("METADATA"), "Name: PyYAML\nVersion: v6.0.1\n").unwrap();

        assert_eq!(execute("pyyaml", &temp).unwrap(), "6.0.1\n");
    }

    #[test]
    fn missing_package_is_not_installed_error() {
        let temp = TempDir::new().unwrap();
        let err = execute("notarealpackage123", &temp).unwrap_err();
        assert!(matches!(err, OptDepsError::NotInstalled { .. }));
    }
}
