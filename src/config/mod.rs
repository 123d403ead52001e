//! Configuration for metadata lookup.
//!
//! This module decides where installed-package metadata is searched:
//! - Schema definitions in [`schema`]
//! - Environment and file loading in [`loader`]
//! - Interpreter site-packages discovery in [`interpreter`]
//!
//! # Example
//!
//! ```
//! use optdeps::config::{ConfigFile, LookupConfig};
//! use std::ffi::OsString;
//! use std::path::PathBuf;
//!
//! let config = LookupConfig::from_env_values(
//!     Some(OsString::from("/opt/site-packages")),
//!     None,
//!     &ConfigFile::default(),
//! );
//! assert_eq!(config.search_paths, vec![PathBuf::from("/opt/site-packages")]);
//! ```

pub mod interpreter;
pub mod loader;
pub mod schema;

pub use interpreter::interpreter_site_packages;
pub use loader::{
    includes_system_site_packages, load_config_file, parse_config, virtualenv_site_packages,
    LookupConfig, PATH_ENV, VIRTUAL_ENV,
};
pub use schema::ConfigFile;
