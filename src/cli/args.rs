//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// optdeps - Check optional Python package dependencies.
#[derive(Debug, Parser)]
#[command(name = "optdeps")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Metadata directory to search before all others (repeatable)
    #[arg(short, long = "path", global = true, value_name = "DIR")]
    pub paths: Vec<PathBuf>,

    /// Path to a YAML config file
    #[arg(short, long, global = true, env = "OPTDEPS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check that packages are installed, optionally within a version bound
    Check(CheckArgs),

    /// Print the installed version of a package
    Version(VersionArgs),

    /// Show how a package name resolves, including unparsable versions
    Inspect(InspectArgs),

    /// Print the effective metadata search path
    Paths,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CheckArgs {
    /// Requirements as NAME or NAME<op>VERSION (e.g. "numpy>=1.20")
    #[arg(required = true, value_name = "REQUIREMENT")]
    pub requirements: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `version` command.
#[derive(Debug, Clone, clap::Args)]
pub struct VersionArgs {
    /// Package name
    pub name: String,
}

/// Arguments for the `inspect` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InspectArgs {
    /// Package name
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
