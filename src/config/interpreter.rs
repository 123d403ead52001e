//! Interpreter site-packages discovery.
//!
//! Outside a virtualenv, installed packages live in the interpreter's own
//! directories. They are probed in the order the interpreter puts them on
//! `sys.path`:
//!
//! 1. `PYTHONPATH` entries
//! 2. The user site (`PYTHONUSERBASE`, default `~/.local`), unless
//!    `PYTHONNOUSERSITE` is set
//! 3. The selected pyenv versions (`PYENV_ROOT`, default `~/.pyenv`)
//! 4. System prefixes (`/usr/local`, `/usr`, Homebrew)
//!
//! Within one prefix, newer interpreters come first.

use std::env::VarError;
use std::fs;
use std::path::{Path, PathBuf};

pub const PYTHONPATH: &str = "PYTHONPATH";
pub const PYTHONUSERBASE: &str = "PYTHONUSERBASE";
pub const PYTHONNOUSERSITE: &str = "PYTHONNOUSERSITE";
pub const PYENV_ROOT: &str = "PYENV_ROOT";
pub const PYENV_VERSION: &str = "PYENV_VERSION";

/// Unix installation prefixes searched last.
const UNIX_PREFIXES: &[&str] = &["/usr/local", "/usr", "/opt/homebrew"];

/// Site-packages directories of the interpreters on this machine.
pub fn interpreter_site_packages() -> Vec<PathBuf> {
    interpreter_site_packages_with_env(|key: &str| std::env::var(key))
}

/// [`interpreter_site_packages`] with a custom env var lookup function.
pub fn interpreter_site_packages_with_env<F>(env_fn: F) -> Vec<PathBuf>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
    probe_site_packages(&home, &system_prefixes(&env_fn), &env_fn)
}

/// Probe every location relative to `home` and the given system prefixes.
pub fn probe_site_packages<F>(home: &Path, system_prefixes: &[PathBuf], env_fn: &F) -> Vec<PathBuf>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let mut candidates = Vec::new();

    if let Ok(value) = env_fn(PYTHONPATH) {
        candidates.extend(std::env::split_paths(&value).filter(|p| p.is_dir()));
    }

    let user_site_disabled = env_fn(PYTHONNOUSERSITE).is_ok_and(|v| !v.is_empty());
    if !user_site_disabled {
        let base = env_fn(PYTHONUSERBASE)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_user_base(home, env_fn));
        candidates.extend(user_site_packages(&base));
    }

    let pyenv_root = env_fn(PYENV_ROOT)
        .map(PathBuf::from)
        .unwrap_or_else(|_| home.join(".pyenv"));
    for version in pyenv_versions(&pyenv_root, env_fn) {
        candidates.extend(prefix_site_packages(&pyenv_root.join("versions").join(version)));
    }

    for prefix in system_prefixes {
        candidates.extend(prefix_site_packages(prefix));
    }

    let mut found: Vec<PathBuf> = Vec::with_capacity(candidates.len());
    for path in candidates {
        if !found.contains(&path) {
            found.push(path);
        }
    }
    tracing::debug!("Interpreter site-packages: {:?}", found);
    found
}

fn system_prefixes<F>(env_fn: &F) -> Vec<PathBuf>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    if cfg!(windows) {
        return env_fn("LOCALAPPDATA")
            .map(|local| python_dirs(&Path::new(&local).join("Programs").join("Python")))
            .unwrap_or_default();
    }
    UNIX_PREFIXES.iter().map(PathBuf::from).collect()
}

fn default_user_base<F>(home: &Path, env_fn: &F) -> PathBuf
where
    F: Fn(&str) -> Result<String, VarError>,
{
    if cfg!(windows) {
        if let Ok(appdata) = env_fn("APPDATA") {
            return PathBuf::from(appdata).join("Python");
        }
    }
    home.join(".local")
}

/// `~/.local/lib/python3.X/site-packages` (Unix) or
/// `%APPDATA%\Python\Python3XX\site-packages` (Windows).
fn user_site_packages(base: &Path) -> Vec<PathBuf> {
    let parent = if cfg!(windows) {
        base.to_path_buf()
    } else {
        base.join("lib")
    };
    python_dirs(&parent)
        .into_iter()
        .map(|dir| dir.join("site-packages"))
        .filter(|dir| dir.is_dir())
        .collect()
}

/// Site directories under an installation prefix.
///
/// Debian-style `dist-packages` and the unversioned `lib/python3` are
/// included alongside `site-packages`.
pub fn prefix_site_packages(prefix: &Path) -> Vec<PathBuf> {
    if cfg!(windows) {
        let path = prefix.join("Lib").join("site-packages");
        return if path.is_dir() { vec![path] } else { Vec::new() };
    }

    ["lib", "lib64"]
        .iter()
        .flat_map(|lib| python_dirs(&prefix.join(lib)))
        .flat_map(|dir| [dir.join("site-packages"), dir.join("dist-packages")])
        .filter(|dir| dir.is_dir())
        .collect()
}

/// Versions selected by `PYENV_VERSION` or the global `version` file,
/// falling back to every installed version, newest first.
fn pyenv_versions<F>(root: &Path, env_fn: &F) -> Vec<String>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let selected: Vec<String> = match env_fn(PYENV_VERSION) {
        Ok(value) => value.split(':').map(str::to_string).collect(),
        Err(_) => fs::read_to_string(root.join("version"))
            .map(|content| content.lines().map(str::to_string).collect())
            .unwrap_or_default(),
    };
    let selected: Vec<String> = selected
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.starts_with('#') && v != "system")
        .collect();
    if !selected.is_empty() {
        return selected;
    }

    let Ok(entries) = fs::read_dir(root.join("versions")) else {
        return Vec::new();
    };
    let mut installed: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    installed.sort_by_key(|name| std::cmp::Reverse(interpreter_version_key(name)));
    installed
}

/// `python3*` directories under `parent`, newest interpreter first.
pub(crate) fn python_dirs(parent: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(parent) else {
        return Vec::new();
    };

    let mut found: Vec<(Vec<u32>, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.to_ascii_lowercase().starts_with("python3") || !entry.path().is_dir() {
                return None;
            }
            Some((interpreter_version_key(&name), entry.path()))
        })
        .collect();
    found.sort_by(|a, b| b.cmp(a));
    found.into_iter().map(|(_, path)| path).collect()
}

/// Numeric key for names like `python3.12`, `python3.13t`, `Python311`
/// or `3.11.7`.
fn interpreter_version_key(name: &str) -> Vec<u32> {
    name.trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .split('.')
        .map(|part| {
            let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().unwrap_or(0)
        })
        .collect()
}
