//! Configuration schema definitions for optdeps.
//!
//! This module contains the struct that maps to the YAML configuration
//! file format:
//!
//! ```yaml
//! search_paths:
//!   - /opt/venv/lib/python3.12/site-packages
//!   - vendor/site-packages   # relative to the config file
//! include_virtualenv: false
//! include_interpreter: true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root structure of an optdeps config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Extra metadata directories, searched after `OPTDEPS_PATH`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub search_paths: Vec<PathBuf>,

    /// Whether to search the active virtualenv (`VIRTUAL_ENV`)
    pub include_virtualenv: bool,

    /// Whether to search the interpreter's own site-packages when no
    /// isolated virtualenv is active
    pub include_interpreter: bool,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            include_virtualenv: true,
            include_interpreter: true,
        }
    }
}
