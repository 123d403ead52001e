//! Filesystem metadata source.
//!
//! Scans `site-packages` style directories for installed distributions:
//!
//! - `<name>-<version>.dist-info/` with a `METADATA` file (wheel installs)
//! - `<name>-<version>[-pyX.Y].egg-info/` with a `PKG-INFO` file
//! - `<name>-<version>[-pyX.Y].egg-info` as a plain `PKG-INFO` style file
//! - `<name>.egg-info/` (development installs, version only in `PKG-INFO`)
//!
//! The version comes from the `Version:` header of the metadata file, falling
//! back to the version embedded in the directory name.

use std::fs;
use std::path::{Path, PathBuf};

use crate::lookup::source::MetadataSource;
use crate::name::NormalizedName;

const DIST_INFO: &str = ".dist-info";
const EGG_INFO: &str = ".egg-info";

/// Native extension suffixes that make a module importable.
const EXTENSION_SUFFIXES: &[&str] = &[".so", ".pyd"];

/// Installed distribution found on the search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    /// Name as spelled in the metadata directory.
    pub raw_name: String,
    /// Path to the `.dist-info` / `.egg-info` entry.
    pub metadata_path: PathBuf,
    /// Raw version string, if one could be found.
    pub version: Option<String>,
}

/// Searches an ordered list of directories; the first match wins.
#[derive(Debug, Clone, Default)]
pub struct SitePackages {
    paths: Vec<PathBuf>,
}

impl SitePackages {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Directories searched, in priority order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Locate the installed distribution for `name`.
    pub fn find_distribution(&self, name: &NormalizedName) -> Option<Distribution> {
        self.paths
            .iter()
            .find_map(|dir| find_in_directory(dir, name))
    }

    /// Whether a top-level module for `name` can be imported.
    ///
    /// Module names are case-sensitive; both the caller's spelling and the
    /// lowercased conventional form are tried.
    pub fn has_module(&self, name: &NormalizedName) -> bool {
        let modules = name.import_names();
        self.paths
            .iter()
            .any(|dir| modules.iter().any(|module| module_exists(dir, module)))
    }
}

impl MetadataSource for SitePackages {
    /// A distribution recorded without any version yields an empty string,
    /// so it reads as installed-but-unparsable rather than absent.
    fn distribution_version(&self, name: &NormalizedName) -> Option<String> {
        self.find_distribution(name)
            .map(|dist| dist.version.unwrap_or_default())
    }

    fn is_present(&self, name: &NormalizedName) -> bool {
        self.find_distribution(name).is_some() || self.has_module(name)
    }
}

fn find_in_directory(dir: &Path, name: &NormalizedName) -> Option<Distribution> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Skipping {}: {}", dir.display(), e);
            return None;
        }
    };

    let mut candidates: Vec<(String, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| (entry.file_name().to_string_lossy().into_owned(), entry.path()))
        .collect();
    // read_dir order is unspecified
    candidates.sort();

    candidates.into_iter().find_map(|(file_name, path)| {
        let (raw_name, dir_version) = split_metadata_name(&file_name)?;
        if !name.matches(raw_name) {
            return None;
        }
        let version = read_metadata_version(&path).or_else(|| dir_version.map(String::from));
        Some(Distribution {
            raw_name: raw_name.to_string(),
            metadata_path: path,
            version,
        })
    })
}

/// Split a metadata entry name into its name and version parts.
///
/// Returns `None` for entries that are not distribution metadata.
fn split_metadata_name(file_name: &str) -> Option<(&str, Option<&str>)> {
    let (stem, is_egg) = if let Some(stem) = file_name.strip_suffix(DIST_INFO) {
        (stem, false)
    } else if let Some(stem) = file_name.strip_suffix(EGG_INFO) {
        (stem, true)
    } else {
        return None;
    };

    match stem.split_once('-') {
        Some((name, rest)) => {
            // egg-info may carry a trailing `-pyX.Y` tag
            let version = if is_egg {
                rest.split('-').next().unwrap_or(rest)
            } else {
                rest
            };
            Some((name, Some(version).filter(|v| !v.is_empty())))
        }
        None => Some((stem, None)),
    }
}

fn read_metadata_version(path: &Path) -> Option<String> {
    let metadata_file = if path.is_dir() {
        ["METADATA", "PKG-INFO"]
            .iter()
            .map(|f| path.join(f))
            .find(|p| p.is_file())?
    } else {
        path.to_path_buf()
    };

    match fs::read_to_string(&metadata_file) {
        Ok(content) => parse_version_header(&content),
        Err(e) => {
            tracing::debug!("Cannot read {}: {}", metadata_file.display(), e);
            None
        }
    }
}

/// Extract the `Version:` header from core metadata.
///
/// Headers end at the first blank line; the rest is the long description.
fn parse_version_header(content: &str) -> Option<String> {
    content
        .lines()
        .take_while(|line| !line.trim().is_empty())
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case("version")
                .then(|| value.trim().to_string())
        })
        .filter(|v| !v.is_empty())
}

fn module_exists(dir: &Path, module: &str) -> bool {
    if dir.join(module).is_dir() || dir.join(format!("{}.py", module)).is_file() {
        return true;
    }

    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    let prefix = format!("{}.", module);
    entries.filter_map(|entry| entry.ok()).any(|entry| {
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        file_name.starts_with(&prefix)
            && EXTENSION_SUFFIXES
                .iter()
                .any(|suffix| file_name.ends_with(suffix))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn name(s: &str) -> NormalizedName {
        NormalizedName::new(s).unwrap()
    }

    fn write_dist_info(dir: &Path, dir_name: &str, metadata: Option<&str>) {
        let info = dir.join(dir_name);
        fs::create_dir_all(&info).unwrap();
        if let Some(metadata) = metadata {
            fs::write(info.join("METADATA"), metadata).unwrap();
        }
    }

    #[test]
    fn finds_dist_info_version_from_metadata() {
        let temp = TempDir::new().unwrap();
        write_dist_info(
            temp.path(),
            "packaging-24.0.dist-info",
            Some("Metadata-Version: 2.1\nName: packaging\nVersion: 24.0\n\nbody\n"),
        );

        let site = SitePackages::new([temp.path()]);
        assert_eq!(
            site.distribution_version(&name("packaging")),
            Some("24.0".to_string())
        );
    }

    #[test]
    fn metadata_header_wins_over_directory_name() {
        let temp = TempDir::new().unwrap();
        write_dist_info(
            temp.path(),
            "demo-1.0.dist-info",
            Some("Name: demo\nVersion: 1.0.post1\n"),
        );

        let site = SitePackages::new([temp.path()]);
        assert_eq!(
            site.distribution_version(&name("demo")),
            Some("1.0.post1".to_string())
        );
    }

    #[test]
    fn falls_back_to_directory_version() {
        let temp = TempDir::new().unwrap();
        write_dist_info(temp.path(), "demo-2.5.dist-info", None);

        let site = SitePackages::new([temp.path()]);
        assert_eq!(site.distribution_version(&name("demo")), Some("2.5".to_string()));
    }

    #[test]
    fn matches_escaped_names() {
        let temp = TempDir::new().unwrap();
        write_dist_info(
            temp.path(),
            "typing_extensions-4.9.0.dist-info",
            Some("Version: 4.9.0\n"),
        );

        let site = SitePackages::new([temp.path()]);
        assert!(site.find_distribution(&name("Typing-Extensions")).is_some());
    }

    #[test]
    fn reads_egg_info_directory_and_file() {
        let temp = TempDir::new().unwrap();
        let egg = temp.path().join("legacy-0.9-py3.11.egg-info");
        fs::create_dir_all(&egg).unwrap();
        fs::write(egg.join("PKG-INFO"), "Name: legacy\nVersion: 0.9\n").unwrap();
        fs::write(
            temp.path().join("flat-3.1-py3.11.egg-info"),
            "Name: flat\nVersion: 3.1\n",
        )
        .unwrap();

        let site = SitePackages::new([temp.path()]);
        assert_eq!(site.distribution_version(&name("legacy")), Some("0.9".to_string()));
        assert_eq!(site.distribution_version(&name("flat")), Some("3.1".to_string()));
    }

    #[test]
    fn development_egg_info_without_version_in_name() {
        let temp = TempDir::new().unwrap();
        let egg = temp.path().join("devpkg.egg-info");
        fs::create_dir_all(&egg).unwrap();
        fs::write(egg.join("PKG-INFO"), "Name: devpkg\nVersion: 0.0.1.dev3\n").unwrap();

        let site = SitePackages::new([temp.path()]);
        assert_eq!(
            site.distribution_version(&name("devpkg")),
            Some("0.0.1.dev3".to_string())
        );
    }

    #[test]
    fn first_search_path_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write_dist_info(first.path(), "demo-1.0.dist-info", Some("Version: 1.0\n"));
        write_dist_info(second.path(), "demo-2.0.dist-info", Some("Version: 2.0\n"));

        let site = SitePackages::new([first.path(), second.path()]);
        assert_eq!(site.distribution_version(&name("demo")), Some("1.0".to_string()));
    }

    #[test]
    fn missing_directories_are_skipped() {
        let temp = TempDir::new().unwrap();
        write_dist_info(temp.path(), "demo-1.0.dist-info", Some("Version: 1.0\n"));

        let site = SitePackages::new([temp.path().join("nope"), temp.path().to_path_buf()]);
        assert!(site.find_distribution(&name("demo")).is_some());
    }

    #[test]
    fn prefix_names_do_not_match() {
        let temp = TempDir::new().unwrap();
        write_dist_info(temp.path(), "numpy_stubs-1.0.dist-info", Some("Version: 1.0\n"));

        let site = SitePackages::new([temp.path()]);
        assert!(site.find_distribution(&name("numpy")).is_none());
    }

    #[test]
    fn module_presence_without_metadata() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("pkg_dir")).unwrap();
        fs::write(temp.path().join("single.py"), "").unwrap();
        fs::write(temp.path().join("native.cpython-312-x86_64-linux-gnu.so"), "").unwrap();

        let site = SitePackages::new([temp.path()]);
        assert!(site.is_present(&name("pkg-dir")));
        assert!(site.is_present(&name("single")));
        assert!(site.is_present(&name("native")));
        assert!(!site.is_present(&name("absent")));
        assert_eq!(site.distribution_version(&name("single")), None);
    }

    #[test]
    fn module_lookup_is_case_sensitive_to_caller_spelling() {
        let temp = TempDir::new().unwrap();
        let pil = temp.path().join("PIL");
        fs::create_dir_all(&pil).unwrap();
        fs::write(pil.join("__init__.py"), "").unwrap();

        let site = SitePackages::new([temp.path()]);
        assert!(site.has_module(&name("PIL")));
        assert!(site.is_present(&name("PIL")));
    }

    #[test]
    fn lowercase_module_found_from_mixed_case_name() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("yaml.py"), "").unwrap();

        let site = SitePackages::new([temp.path()]);
        assert!(site.has_module(&name("YAML")));
    }

    #[test]
    fn distribution_without_any_version_reports_empty_string() {
        let temp = TempDir::new().unwrap();
        write_dist_info(temp.path(), "bare.dist-info", Some("Name: bare
"));

        let site = SitePackages::new([temp.path()]);
        let dist = site.find_distribution(&name("bare")).unwrap();
        assert_eq!(dist.version, None);
        assert_eq!(site.distribution_version(&name("bare")), Some(String::new()));
        assert!(site.is_present(&name("bare")));
    }

    #[test]
    fn split_metadata_name_variants() {
        assert_eq!(
            split_metadata_name("attrs-23.2.0.dist-info"),
            Some(("attrs", Some("23.2.0")))
        );
        assert_eq!(
            split_metadata_name("six-1.16.0-py3.11.egg-info"),
            Some(("six", Some("1.16.0")))
        );
        assert_eq!(split_metadata_name("dev.egg-info"), Some(("dev", None)));
        assert_eq!(split_metadata_name("attrs"), None);
        assert_eq!(split_metadata_name("README.txt"), None);
    }

    #[test]
    fn parse_version_header_stops_at_body() {
        let content = "Name: x\n\nVersion: 9.9\n";
        assert_eq!(parse_version_header(content), None);
        assert_eq!(
            parse_version_header("name: x\nversion:   1.2 \n"),
            Some("1.2".to_string())
        );
    }
}
