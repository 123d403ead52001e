//! optdeps - Runtime checks for optional Python package dependencies.
//!
//! optdeps answers one question: "is optional package X installed, and if
//! so, at what version?" It reads installed-distribution metadata
//! (`*.dist-info` / `*.egg-info` in `site-packages` directories), never
//! modifies it, and lets callers gate features on the result.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Search path discovery and config file loading
//! - [`error`] - Error types and result aliases
//! - [`lookup`] - Version lookup against metadata sources
//! - [`name`] - Package name validation and canonicalization
//! - [`registry`] - Declared optional dependencies, resolved once
//! - [`state`] - Resolved state, comparison operators, and `chain`
//! - [`version`] - Version parsing and ordering
//!
//! # Example
//!
//! ```
//! use optdeps::lookup::StaticIndex;
//! use optdeps::{chain, OptionalDependencies, ResolvedState, Version};
//!
//! let index = StaticIndex::new().with_package("numpy", "1.26.4").unwrap();
//! let deps = OptionalDependencies::declare(index, ["NUMPY", "SCIPY"]).unwrap();
//!
//! let numpy = deps.get("NUMPY").unwrap();
//! let min: Version = "1.20".parse().unwrap();
//! let fast_path = chain(numpy.state().clone(), [*numpy >= min]);
//! assert!(fast_path.is_installed());
//!
//! assert!(!deps.is_installed("SCIPY").unwrap());
//! assert_eq!(deps.get("SCIPY").unwrap().chain([true]), ResolvedState::NotInstalled);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod lookup;
pub mod name;
pub mod registry;
pub mod state;
pub mod version;

pub use error::{OptDepsError, Result};
pub use lookup::{get_version, is_installed, MetadataSource};
pub use name::NormalizedName;
pub use registry::{OptionalDependencies, OptionalDependency};
pub use state::{chain, CompareOp, ResolvedState};
pub use version::Version;
