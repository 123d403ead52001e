//! Package name validation and canonicalization.
//!
//! Distribution names are compared in canonical form: lowercased, with every
//! run of `-`, `_` and `.` collapsed into a single `-`. So `Typing_Extensions`,
//! `typing.extensions` and `typing-extensions` all name the same package.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::{OptDepsError, Result};

static RE_VALID_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9]|[A-Za-z0-9][A-Za-z0-9._-]*[A-Za-z0-9])$").unwrap()
});

static RE_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_.]+").unwrap());

/// A validated package name in canonical form.
///
/// Equality, ordering and hashing use the canonical form only. The caller's
/// spelling is kept for module lookup, since import names are case-sensitive.
///
/// # Example
///
/// ```
/// use optdeps::NormalizedName;
///
/// let name = NormalizedName::new("Typing_Extensions").unwrap();
/// assert_eq!(name.as_str(), "typing-extensions");
/// assert_eq!(name.module_name(), "typing_extensions");
/// ```
#[derive(Debug, Clone)]
pub struct NormalizedName {
    canonical: String,
    raw: String,
}

impl NormalizedName {
    /// Validate and canonicalize a package name.
    pub fn new(name: &str) -> Result<Self> {
        if !RE_VALID_NAME.is_match(name) {
            return Err(OptDepsError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(Self {
            canonical: canonicalize(name),
            raw: name.to_string(),
        })
    }

    /// The canonical form.
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// The name as originally spelled.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Top-level module name conventionally provided by this distribution.
    pub fn module_name(&self) -> String {
        self.canonical.replace('-', "_")
    }

    /// Module names to try when checking importability.
    ///
    /// The caller's spelling comes first (`PIL`), then the lowercased
    /// conventional form (`pil`).
    pub fn import_names(&self) -> Vec<String> {
        let mut names = vec![self.raw.replace('-', "_")];
        let conventional = self.module_name();
        if !names.contains(&conventional) {
            names.push(conventional);
        }
        names
    }

    /// Whether a raw, possibly non-canonical spelling names this package.
    pub fn matches(&self, raw: &str) -> bool {
        canonicalize(raw) == self.canonical
    }
}

impl PartialEq for NormalizedName {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for NormalizedName {}

impl Hash for NormalizedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl PartialOrd for NormalizedName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NormalizedName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl Serialize for NormalizedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical)
    }
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl AsRef<str> for NormalizedName {
    fn as_ref(&self) -> &str {
        &self.canonical
    }
}

/// Canonicalize without validating.
///
/// Used for names read back from metadata directories, which may carry
/// escaped spellings (`typing_extensions-4.9.0.dist-info`).
pub fn canonicalize(name: &str) -> String {
    RE_SEPARATORS
        .replace_all(name, "-")
        .to_ascii_lowercase()
}
