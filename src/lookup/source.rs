//! Metadata source trait and the in-memory source.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::name::NormalizedName;

/// Read-only view of installed-distribution metadata.
pub trait MetadataSource: Send + Sync {
    /// Raw version string of the installed distribution, if any.
    ///
    /// An installed distribution with no recorded version reports an empty
    /// string, not `None`.
    fn distribution_version(&self, name: &NormalizedName) -> Option<String>;

    /// Whether anything with this name is installed or importable.
    fn is_present(&self, name: &NormalizedName) -> bool {
        self.distribution_version(name).is_some()
    }
}

impl<T: MetadataSource + ?Sized> MetadataSource for Arc<T> {
    fn distribution_version(&self, name: &NormalizedName) -> Option<String> {
        (**self).distribution_version(name)
    }

    fn is_present(&self, name: &NormalizedName) -> bool {
        (**self).is_present(name)
    }
}

impl<T: MetadataSource + ?Sized> MetadataSource for &T {
    fn distribution_version(&self, name: &NormalizedName) -> Option<String> {
        (**self).distribution_version(name)
    }

    fn is_present(&self, name: &NormalizedName) -> bool {
        (**self).is_present(name)
    }
}

/// A fixed name → version table.
///
/// # Example
///
/// ```
/// use optdeps::lookup::{MetadataSource, StaticIndex};
/// use optdeps::NormalizedName;
///
/// let index = StaticIndex::new().with_package("Typing_Extensions", "4.9.0").unwrap();
/// let name = NormalizedName::new("typing-extensions").unwrap();
/// assert_eq!(index.distribution_version(&name).as_deref(), Some("4.9.0"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticIndex {
    packages: HashMap<NormalizedName, String>,
}

impl StaticIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` as installed at `version`.
    ///
    /// The version string is stored as-is; it is only parsed on lookup.
    pub fn insert(&mut self, name: &str, version: &str) -> Result<()> {
        self.packages
            .insert(NormalizedName::new(name)?, version.to_string());
        Ok(())
    }

    /// Builder form of [`StaticIndex::insert`].
    pub fn with_package(mut self, name: &str, version: &str) -> Result<Self> {
        self.insert(name, version)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl MetadataSource for StaticIndex {
    fn distribution_version(&self, name: &NormalizedName) -> Option<String> {
        self.packages.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> NormalizedName {
        NormalizedName::new(s).unwrap()
    }

    #[test]
    fn insert_canonicalizes_name() {
        let index = StaticIndex::new().with_package("Ruamel.Yaml", "0.18.5").unwrap();
        assert_eq!(
            index.distribution_version(&name("ruamel-yaml")),
            Some("0.18.5".to_string())
        );
    }

    #[test]
    fn insert_rejects_invalid_name() {
        assert!(StaticIndex::new().with_package("-bad", "1.0").is_err());
    }

    #[test]
    fn missing_package_is_absent() {
        let index = StaticIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.distribution_version(&name("numpy")), None);
        assert!(!index.is_present(&name("numpy")));
    }

    #[test]
    fn presence_does_not_depend_on_version_syntax() {
        let index = StaticIndex::new().with_package("weird", "not a version").unwrap();
        assert!(index.is_present(&name("weird")));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn arc_source_delegates() {
        let index = Arc::new(StaticIndex::new().with_package("numpy", "1.26.4").unwrap());
        let source: Arc<dyn MetadataSource> = index;
        assert!(source.is_present(&name("numpy")));
    }
}
