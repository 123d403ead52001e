//! Check command implementation.
//!
//! The `optdeps check` command reports whether each requirement is met and
//! exits non-zero if any is not.

use std::io::Write;
use std::str::FromStr;

use console::style;
use serde::Serialize;

use crate::cli::args::CheckArgs;
use crate::error::{OptDepsError, Result};
use crate::lookup::SitePackages;
use crate::registry::OptionalDependencies;
use crate::state::{CompareOp, ResolvedState};
use crate::version::Version;

use super::dispatcher::{Command, CommandResult};

/// `NAME` or `NAME<op>VERSION`.
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    pub name: String,
    pub bound: Option<(CompareOp, Version)>,
}

impl FromStr for Requirement {
    type Err = OptDepsError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let Some(split) = s.find(['<', '>', '=', '!', '~']) else {
            return Ok(Self {
                name: s.to_string(),
                bound: None,
            });
        };

        let (name, rest) = s.split_at(split);
        let op_len = rest
            .find(|c: char| !matches!(c, '<' | '>' | '=' | '!' | '~'))
            .unwrap_or(rest.len());
        let (symbol, version) = rest.split_at(op_len);

        let op = CompareOp::from_symbol(symbol).ok_or_else(|| {
            OptDepsError::Other(anyhow::anyhow!(
                "Unsupported operator '{}' in requirement '{}'",
                symbol,
                s
            ))
        })?;

        Ok(Self {
            name: name.trim().to_string(),
            bound: Some((op, version.parse()?)),
        })
    }
}

/// Outcome for one requirement.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub requirement: String,
    pub name: String,
    #[serde(flatten)]
    pub state: ResolvedState,
    pub satisfied: bool,
}

/// The check command implementation.
pub struct CheckCommand {
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(args: CheckArgs) -> Self {
        Self { args }
    }

    /// Evaluate every requirement against `source`.
    pub fn evaluate(&self, source: &SitePackages) -> Result<Vec<CheckReport>> {
        let requirements = self
            .args
            .requirements
            .iter()
            .map(|r| r.parse::<Requirement>())
            .collect::<Result<Vec<_>>>()?;

        let deps = self
            .args
            .requirements
            .iter()
            .zip(&requirements)
            .try_fold(
                OptionalDependencies::builder(source.clone()),
                |builder, (raw, req)| builder.declare_as(raw, &req.name),
            )?
            .build();

        Ok(deps
            .iter()
            .zip(requirements)
            .map(|(dep, req)| {
                let satisfied = match &req.bound {
                    Some((op, bound)) => dep.satisfies(*op, bound),
                    None => dep.is_installed(),
                };
                CheckReport {
                    requirement: dep.identifier().to_string(),
                    name: dep.name().to_string(),
                    state: dep.state().clone(),
                    satisfied,
                }
            })
            .collect())
    }
}

impl Command for CheckCommand {
    fn execute(&self, source: &SitePackages, out: &mut dyn Write) -> Result<CommandResult> {
        let reports = self.evaluate(source)?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&reports).map_err(anyhow::Error::from)?;
            writeln!(out, "{}", json)?;
        } else {
            for report in &reports {
                let mark = if report.satisfied {
                    style("✓").green()
                } else {
                    style("✗").red()
                };
                write!(out, "{} {} {}", mark, report.name, report.state)?;
                if !report.satisfied && report.state.is_installed() {
                    write!(out, " (requires {})", report.requirement)?;
                }
                writeln!(out)?;
            }
        }

        if reports.iter().all(|r| r.satisfied) {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}
