//! Inspect command implementation.
//!
//! The `optdeps inspect` command shows the full lookup picture for one
//! package: where its metadata lives, whether the recorded version parses,
//! and whether a module of that name is importable.

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::cli::args::InspectArgs;
use crate::error::Result;
use crate::lookup::{inspect, is_present, Probe, SitePackages};
use crate::name::NormalizedName;

use super::dispatcher::{Command, CommandResult};

/// Everything known about one package name.
#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub name: NormalizedName,
    #[serde(flatten)]
    pub probe: Probe,
    pub present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PathBuf>,
}

/// The inspect command implementation.
pub struct InspectCommand {
    args: InspectArgs,
}

impl InspectCommand {
    /// Create a new inspect command.
    pub fn new(args: InspectArgs) -> Self {
        Self { args }
    }

    /// Build the report without printing it.
    pub fn report(&self, source: &SitePackages) -> Result<InspectReport> {
        let name = NormalizedName::new(&self.args.name)?;
        Ok(InspectReport {
            probe: inspect(source, &name),
            present: is_present(source, &name),
            metadata: source.find_distribution(&name).map(|d| d.metadata_path),
            name,
        })
    }
}

impl Command for InspectCommand {
    fn execute(&self, source: &SitePackages, out: &mut dyn Write) -> Result<CommandResult> {
        let report = self.report(source)?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?;
            writeln!(out, "{}", json)?;
            return Ok(CommandResult::success());
        }

        writeln!(out, "name:     {}", report.name)?;
        match &report.probe {
            Probe::Found(v) => writeln!(out, "status:   installed ({})", v)?,
            Probe::Unparsable(raw) if raw.is_empty() => {
                writeln!(out, "status:   not installed (no version recorded)")?
            }
            Probe::Unparsable(raw) => {
                writeln!(out, "status:   not installed (unparsable version {:?})", raw)?
            }
            Probe::Missing => writeln!(out, "status:   not installed")?,
        }
        writeln!(out, "present:  {}", if report.present { "yes" } else { "no" })?;
        if let Some(path) = &report.metadata {
            writeln!(out, "metadata: {}", path.display())?;
        }
        Ok(CommandResult::success())
    }
}
