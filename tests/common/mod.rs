//! Shared fixtures: fake site-packages trees.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write a wheel-style `.dist-info` directory.
pub fn add_dist_info(dir: &Path, name: &str, version: &str) {
    let info = dir.join(format!("{}-{}.dist-info", name.replace('-', "_"), version));
    fs::create_dir_all(&info).unwrap();
    fs::write(
        info.join("METADATA"),
        format!(
            "Metadata-Version: 2.1\nName: {}\nVersion: {}\n\nLong description.\n",
            name, version
        ),
    )
    .unwrap();
}

/// A site-packages directory with `packaging` and `pytest` installed,
/// plus `broken`, whose recorded version does not parse.
pub fn test_site() -> TempDir {
    let temp = TempDir::new().unwrap();
    add_dist_info(temp.path(), "packaging", "24.0");
    add_dist_info(temp.path(), "pytest", "8.1.1");

    let broken = temp.path().join("broken-0.dist-info");
    fs::create_dir_all(&broken).unwrap();
    fs::write(broken.join("METADATA"), "Name: broken\nVersion: nightly build\n").unwrap();
    temp
}
