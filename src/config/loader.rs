//! Search path discovery and config loading.
//!
//! The effective search path is assembled in priority order (earlier
//! directories win when a package is installed in more than one):
//!
//! 1. Paths given explicitly (CLI `--path`)
//! 2. `OPTDEPS_PATH` (platform path list)
//! 3. `search_paths` from the config file
//! 4. The active virtualenv's `site-packages` (`VIRTUAL_ENV`)
//! 5. The interpreter's own directories (see [`crate::config::interpreter`]),
//!    unless an isolated virtualenv is active

use crate::config::interpreter::{interpreter_site_packages_with_env, python_dirs};
use crate::config::schema::ConfigFile;
use crate::error::{OptDepsError, Result};
use crate::lookup::SitePackages;
use std::env::{self, VarError};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding extra metadata directories.
pub const PATH_ENV: &str = "OPTDEPS_PATH";

/// Environment variable set by an activated virtualenv.
pub const VIRTUAL_ENV: &str = "VIRTUAL_ENV";

/// Resolved lookup configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupConfig {
    /// Directories searched for distribution metadata, in priority order.
    pub search_paths: Vec<PathBuf>,
}

impl LookupConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_env_with(|key: &str| env::var(key), &ConfigFile::default())
    }

    /// Build the configuration from the environment plus a config file.
    pub fn from_env_and_file(path: &Path) -> Result<Self> {
        let file = load_config_file(path)?;
        let base = path.parent().unwrap_or(Path::new("."));
        let file = ConfigFile {
            search_paths: file
                .search_paths
                .into_iter()
                .map(|p| if p.is_relative() { base.join(p) } else { p })
                .collect(),
            ..file
        };

        Ok(Self::from_env_with(|key: &str| env::var(key), &file))
    }

    /// Build the configuration with a custom env var lookup function.
    ///
    /// Interpreter directories are appended unless a virtualenv that
    /// excludes system site-packages is in use.
    pub fn from_env_with<F>(env_fn: F, file: &ConfigFile) -> Self
    where
        F: Fn(&str) -> std::result::Result<String, VarError>,
    {
        let virtual_env = env_fn(VIRTUAL_ENV).ok().map(PathBuf::from);
        let mut config = Self::from_env_values(
            env_fn(PATH_ENV).ok().map(OsString::from),
            virtual_env.clone(),
            file,
        );

        let isolated = match &virtual_env {
            Some(venv) if file.include_virtualenv => !includes_system_site_packages(venv),
            _ => false,
        };
        if file.include_interpreter && !isolated {
            config.push_unique(interpreter_site_packages_with_env(env_fn));
        }
        config
    }

    /// Assemble search paths from explicit environment values.
    ///
    /// Interpreter directories are not probed here.
    pub fn from_env_values(
        optdeps_path: Option<OsString>,
        virtual_env: Option<PathBuf>,
        file: &ConfigFile,
    ) -> Self {
        let mut search_paths: Vec<PathBuf> = optdeps_path
            .as_deref()
            .map(|value| env::split_paths(value).collect())
            .unwrap_or_default();
        search_paths.retain(|p| !p.as_os_str().is_empty());

        search_paths.extend(file.search_paths.iter().cloned());

        if file.include_virtualenv {
            if let Some(venv) = virtual_env {
                search_paths.extend(virtualenv_site_packages(&venv));
            }
        }

        let mut config = Self::default();
        config.push_unique(search_paths);
        config
    }

    /// Put `paths` ahead of everything already configured.
    pub fn prepend<I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let existing = std::mem::take(&mut self.search_paths);
        self.push_unique(paths);
        self.push_unique(existing);
    }

    fn push_unique<I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        for path in paths {
            if !self.search_paths.contains(&path) {
                self.search_paths.push(path);
            }
        }
    }

    /// Build the filesystem metadata source for these paths.
    pub fn into_source(self) -> SitePackages {
        SitePackages::new(self.search_paths)
    }
}

/// Find the `site-packages` directories inside a virtualenv.
///
/// Unix layouts keep one per interpreter (`lib/python3.12/site-packages`);
/// Windows uses `Lib/site-packages`.
pub fn virtualenv_site_packages(venv: &Path) -> Vec<PathBuf> {
    if cfg!(windows) {
        let path = venv.join("Lib").join("site-packages");
        return if path.is_dir() { vec![path] } else { Vec::new() };
    }

    python_dirs(&venv.join("lib"))
        .into_iter()
        .map(|dir| dir.join("site-packages"))
        .filter(|path| path.is_dir())
        .collect()
}

/// Whether the virtualenv's `pyvenv.cfg` opts into system site-packages.
pub fn includes_system_site_packages(venv: &Path) -> bool {
    let Ok(content) = fs::read_to_string(venv.join("pyvenv.cfg")) else {
        return false;
    };
    content.lines().any(|line| {
        line.split_once('=').is_some_and(|(key, value)| {
            key.trim().eq_ignore_ascii_case("include-system-site-packages")
                && value.trim().eq_ignore_ascii_case("true")
        })
    })
}

/// Load and parse a config file.
///
/// # Errors
///
/// Returns `Io` if the file can't be read.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)?;
    parse_config(&content, path)
}

/// Parse YAML content into a [`ConfigFile`].
///
/// An empty document yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<ConfigFile> {
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(content).map_err(|e| OptDepsError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
