//! Version lookup against installed-package metadata.
//!
//! [`lookup`] answers "is this package installed, and at what version?" for
//! an already-normalized name. It never fails: a missing distribution and a
//! distribution whose version string does not parse both come back as
//! [`ResolvedState::NotInstalled`]. [`inspect`] keeps the two apart for
//! diagnostics.
//!
//! Nothing here caches; see [`crate::registry`] for resolve-once entries.
//!
//! # Modules
//!
//! - [`source`] - The [`MetadataSource`] trait and the in-memory [`StaticIndex`]
//! - [`site_packages`] - Filesystem scanning of `site-packages` directories

pub mod site_packages;
pub mod source;

pub use site_packages::{Distribution, SitePackages};
pub use source::{MetadataSource, StaticIndex};

use serde::Serialize;

use crate::config::LookupConfig;
use crate::error::Result;
use crate::name::NormalizedName;
use crate::state::ResolvedState;
use crate::version::Version;

/// Three-way lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "version", rename_all = "snake_case")]
pub enum Probe {
    /// Installed with a valid version.
    Found(Version),
    /// Installed, but the recorded version string does not parse.
    Unparsable(String),
    /// No distribution with this name.
    Missing,
}

impl Probe {
    /// Collapse to the two-state form used for gating.
    pub fn into_state(self) -> ResolvedState {
        match self {
            Probe::Found(v) => ResolvedState::Installed(v),
            Probe::Unparsable(_) | Probe::Missing => ResolvedState::NotInstalled,
        }
    }
}

impl From<Probe> for ResolvedState {
    fn from(probe: Probe) -> Self {
        probe.into_state()
    }
}

/// Look up `name` and report why it is or is not usable.
pub fn inspect<S>(source: &S, name: &NormalizedName) -> Probe
where
    S: MetadataSource + ?Sized,
{
    let Some(raw) = source.distribution_version(name) else {
        tracing::debug!("{} is not installed", name);
        return Probe::Missing;
    };

    match Version::parse(&raw) {
        Ok(version) => {
            tracing::debug!("{} is installed at {}", name, version);
            Probe::Found(version)
        }
        Err(_) if raw.is_empty() => {
            tracing::warn!("Treating {} as not installed: no version recorded", name);
            Probe::Unparsable(raw)
        }
        Err(e) => {
            tracing::warn!("Treating {} as not installed: {}", name, e);
            Probe::Unparsable(raw)
        }
    }
}

/// Resolve `name` to its installed version or `NotInstalled`.
///
/// # Example
///
/// ```
/// use optdeps::lookup::{lookup, StaticIndex};
/// use optdeps::{NormalizedName, ResolvedState};
///
/// let index = StaticIndex::new().with_package("packaging", "24.0").unwrap();
/// let packaging = NormalizedName::new("packaging").unwrap();
/// let absent = NormalizedName::new("notarealpackage123").unwrap();
///
/// assert!(lookup(&index, &packaging).is_installed());
/// assert_eq!(lookup(&index, &absent), ResolvedState::NotInstalled);
/// ```
pub fn lookup<S>(source: &S, name: &NormalizedName) -> ResolvedState
where
    S: MetadataSource + ?Sized,
{
    inspect(source, name).into_state()
}

/// Whether a distribution or importable module named `name` exists,
/// regardless of whether its version parses.
pub fn is_present<S>(source: &S, name: &NormalizedName) -> bool
where
    S: MetadataSource + ?Sized,
{
    source.is_present(name)
}

/// Metadata source for the current process environment.
pub fn default_source() -> SitePackages {
    LookupConfig::from_env().into_source()
}

/// Look up a raw package name in the current environment.
///
/// # Errors
///
/// Returns `InvalidName` if `name` is not a valid package name.
pub fn get_version(name: &str) -> Result<ResolvedState> {
    let name = NormalizedName::new(name)?;
    Ok(lookup(&default_source(), &name))
}

/// Check a raw package name for presence in the current environment.
///
/// # Errors
///
/// Returns `InvalidName` if `name` is not a valid package name.
pub fn is_installed(name: &str) -> Result<bool> {
    let name = NormalizedName::new(name)?;
    Ok(is_present(&default_source(), &name))
}
