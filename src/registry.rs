//! Declared optional dependencies, each resolved once.
//!
//! A consumer declares the closed set of optional dependencies it cares
//! about, keyed by symbolic identifiers of its own choosing. Names are
//! validated at declaration; the installed state of each entry is looked up
//! on first access and then fixed for the life of the registry.
//!
//! # Example
//!
//! ```
//! use optdeps::lookup::StaticIndex;
//! use optdeps::{CompareOp, OptionalDependencies, Version};
//!
//! let index = StaticIndex::new().with_package("packaging", "24.0").unwrap();
//! let deps = OptionalDependencies::builder(index)
//!     .declare("PACKAGING").unwrap()
//!     .declare("NOTAREALPACKAGE123").unwrap()
//!     .declare_as("YAML", "PyYAML").unwrap()
//!     .build();
//!
//! let packaging = deps.get("PACKAGING").unwrap();
//! let bound: Version = "0.1".parse().unwrap();
//! assert!(packaging.is_installed());
//! assert!(*packaging > bound);
//! assert_eq!(packaging.compare(CompareOp::Ge, &bound), Some(true));
//!
//! let absent = deps.get("NOTAREALPACKAGE123").unwrap();
//! assert!(!absent.is_installed());
//! assert!(!(*absent > bound));
//! assert!(absent.version().is_err());
//! ```
//!
//! For process-wide declarations, put the registry in a static:
//!
//! ```no_run
//! use std::sync::LazyLock;
//! use optdeps::OptionalDependencies;
//!
//! static OPTIONAL: LazyLock<OptionalDependencies> = LazyLock::new(|| {
//!     OptionalDependencies::from_env(["NUMPY", "SCIPY"]).expect("valid package names")
//! });
//!
//! if OPTIONAL.get("NUMPY").is_some_and(|numpy| numpy.is_installed()) {
//!     // enable the numpy-backed code path
//! }
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::ptr;
use std::sync::{Arc, OnceLock};

use crate::error::{OptDepsError, Result};
use crate::lookup::{default_source, lookup, MetadataSource};
use crate::name::NormalizedName;
use crate::state::{CompareOp, ResolvedState};
use crate::version::Version;

/// Right-hand side of [`OptionalDependency::compare`].
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    Version(&'a Version),
    Dependency(&'a OptionalDependency),
}

impl<'a> From<&'a Version> for Operand<'a> {
    fn from(version: &'a Version) -> Self {
        Operand::Version(version)
    }
}

impl<'a> From<&'a OptionalDependency> for Operand<'a> {
    fn from(dependency: &'a OptionalDependency) -> Self {
        Operand::Dependency(dependency)
    }
}

/// One declared optional dependency.
pub struct OptionalDependency {
    identifier: String,
    name: NormalizedName,
    state: OnceLock<ResolvedState>,
    source: Arc<dyn MetadataSource>,
}

impl OptionalDependency {
    fn new(identifier: String, name: NormalizedName, source: Arc<dyn MetadataSource>) -> Self {
        Self {
            identifier,
            name,
            state: OnceLock::new(),
            source,
        }
    }

    /// The symbolic identifier this entry was declared under.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The package name looked up for this entry.
    pub fn name(&self) -> &NormalizedName {
        &self.name
    }

    /// The resolved state, looking it up on first access.
    pub fn state(&self) -> &ResolvedState {
        self.state.get_or_init(|| {
            tracing::debug!("Resolving {} as '{}'", self.identifier, self.name);
            lookup(&*self.source, &self.name)
        })
    }

    /// Whether the state has been looked up yet.
    pub fn is_resolved(&self) -> bool {
        self.state.get().is_some()
    }

    pub fn is_installed(&self) -> bool {
        self.state().is_installed()
    }

    /// The installed version.
    ///
    /// # Errors
    ///
    /// Returns `NotInstalled` when the package is absent.
    pub fn version(&self) -> Result<&Version> {
        self.state()
            .version()
            .ok_or_else(|| OptDepsError::NotInstalled {
                identifier: self.identifier.clone(),
                name: self.name.to_string(),
            })
    }

    /// Compare this entry against a version or another entry.
    ///
    /// Returns `None` when the comparison does not apply (ordering against
    /// another entry). An absent package compares false under every
    /// operator; an entry always equals itself.
    pub fn compare<'a>(&self, op: CompareOp, operand: impl Into<Operand<'a>>) -> Option<bool> {
        match operand.into() {
            Operand::Version(other) => Some(self.state().compare(op, other)),
            Operand::Dependency(other) if op == CompareOp::Eq => {
                if ptr::eq(self, other) {
                    return Some(true);
                }
                let equal = match (self.state().version(), other.state().version()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                };
                Some(equal)
            }
            Operand::Dependency(_) => None,
        }
    }

    /// Whether the installed version satisfies `<op> bound`.
    pub fn satisfies(&self, op: CompareOp, bound: &Version) -> bool {
        self.state().compare(op, bound)
    }

    /// This entry's state, kept only if every check passed.
    pub fn chain<I>(&self, checks: I) -> ResolvedState
    where
        I: IntoIterator<Item = bool>,
    {
        self.state().clone().chain(checks)
    }
}

impl fmt::Debug for OptionalDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionalDependency")
            .field("identifier", &self.identifier)
            .field("name", &self.name)
            .field("state", &self.state.get())
            .finish()
    }
}

impl PartialEq for OptionalDependency {
    fn eq(&self, other: &Self) -> bool {
        self.compare(CompareOp::Eq, other) == Some(true)
    }
}

impl PartialEq<Version> for OptionalDependency {
    fn eq(&self, other: &Version) -> bool {
        self.satisfies(CompareOp::Eq, other)
    }
}

impl PartialOrd<Version> for OptionalDependency {
    /// `None` when not installed, which makes every ordered operator false.
    fn partial_cmp(&self, other: &Version) -> Option<Ordering> {
        self.state().version().map(|v| v.cmp(other))
    }
}

impl PartialEq<OptionalDependency> for Version {
    fn eq(&self, other: &OptionalDependency) -> bool {
        other == self
    }
}

impl PartialOrd<OptionalDependency> for Version {
    fn partial_cmp(&self, other: &OptionalDependency) -> Option<Ordering> {
        other.partial_cmp(self).map(Ordering::reverse)
    }
}

/// A closed set of declared optional dependencies.
#[derive(Debug)]
pub struct OptionalDependencies {
    entries: Vec<OptionalDependency>,
    index: HashMap<String, usize>,
}

impl OptionalDependencies {
    /// Start a declaration backed by `source`.
    pub fn builder<S>(source: S) -> RegistryBuilder
    where
        S: MetadataSource + 'static,
    {
        RegistryBuilder {
            source: Arc::new(source),
            entries: Vec::new(),
        }
    }

    /// Declare `identifiers`, each looked up under its own spelling.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` or `DuplicateIdentifier` for a bad declaration.
    pub fn declare<S, I, T>(source: S, identifiers: I) -> Result<Self>
    where
        S: MetadataSource + 'static,
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        identifiers
            .into_iter()
            .try_fold(Self::builder(source), |builder, id| builder.declare(id.as_ref()))
            .map(RegistryBuilder::build)
    }

    /// [`OptionalDependencies::declare`] against the current environment.
    pub fn from_env<I, T>(identifiers: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self::declare(default_source(), identifiers)
    }

    pub fn get(&self, identifier: &str) -> Option<&OptionalDependency> {
        self.index.get(identifier).map(|&i| &self.entries[i])
    }

    /// Like [`OptionalDependencies::get`], but undeclared identifiers are an error.
    pub fn dependency(&self, identifier: &str) -> Result<&OptionalDependency> {
        self.get(identifier)
            .ok_or_else(|| OptDepsError::UnknownIdentifier {
                identifier: identifier.to_string(),
            })
    }

    pub fn is_installed(&self, identifier: &str) -> Result<bool> {
        Ok(self.dependency(identifier)?.is_installed())
    }

    pub fn version(&self, identifier: &str) -> Result<&Version> {
        self.dependency(identifier)?.version()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, OptionalDependency> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a OptionalDependencies {
    type Item = &'a OptionalDependency;
    type IntoIter = std::slice::Iter<'a, OptionalDependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Collects declarations for an [`OptionalDependencies`] registry.
pub struct RegistryBuilder {
    source: Arc<dyn MetadataSource>,
    entries: Vec<(String, NormalizedName)>,
}

impl RegistryBuilder {
    /// Declare `identifier`, deriving the package name from its spelling
    /// (`TYPING_EXTENSIONS` looks up `typing-extensions`).
    pub fn declare(self, identifier: &str) -> Result<Self> {
        self.declare_as(identifier, identifier)
    }

    /// Declare `identifier` with an explicit package name.
    pub fn declare_as(mut self, identifier: &str, name: &str) -> Result<Self> {
        let name = NormalizedName::new(name)?;
        if self.entries.iter().any(|(id, _)| id == identifier) {
            return Err(OptDepsError::DuplicateIdentifier {
                identifier: identifier.to_string(),
            });
        }
        self.entries.push((identifier.to_string(), name));
        Ok(self)
    }

    /// Finish the declaration. Nothing is looked up yet.
    pub fn build(self) -> OptionalDependencies {
        let mut index = HashMap::with_capacity(self.entries.len());
        let entries = self
            .entries
            .into_iter()
            .enumerate()
            .map(|(i, (identifier, name))| {
                index.insert(identifier.clone(), i);
                OptionalDependency::new(identifier, name, Arc::clone(&self.source))
            })
            .collect();
        OptionalDependencies { entries, index }
    }
}
