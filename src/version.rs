//! Version parsing and ordering.
//!
//! Installed distributions record their version in the PEP 440 format:
//!
//! ```text
//! [N!]N(.N)*[{a|b|rc}N][.postN][.devN][+local]
//! ```
//!
//! Parsing accepts the lenient spellings found in real metadata (`v1.0`,
//! `1.0-alpha-1`, `1.0-1`, `1.0.post`, `1.0+Ubuntu-1`) and [`Version`]'s
//! `Display` writes the normalized form back out.
//!
//! Ordering compares, in turn: epoch, release (numerically, trailing zeros
//! ignored so `1.0 == 1.0.0`), pre-release (`a < b < rc < final`), post
//! release, dev release, and finally the local label.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Serialize, Serializer};

use crate::error::{OptDepsError, Result};

static RE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        ^\s*
        v?
        (?:
            (?:(?P<epoch>[0-9]+)!)?
            (?P<release>[0-9]+(?:\.[0-9]+)*)
            (?P<pre>
                [-_\.]?
                (?P<pre_l>alpha|a|beta|b|preview|pre|c|rc)
                [-_\.]?
                (?P<pre_n>[0-9]+)?
            )?
            (?P<post>
                (?:-(?P<post_n1>[0-9]+))
                |
                (?:
                    [-_\.]?
                    (?P<post_l>post|rev|r)
                    [-_\.]?
                    (?P<post_n2>[0-9]+)?
                )
            )?
            (?P<dev>
                [-_\.]?
                (?P<dev_l>dev)
                [-_\.]?
                (?P<dev_n>[0-9]+)?
            )?
        )
        (?:\+(?P<local>[a-z0-9]+(?:[-_\.][a-z0-9]+)*))?
        \s*$",
    )
    .unwrap()
});

static RE_LOCAL_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_\.]").unwrap());

/// Pre-release phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreRelease {
    Alpha,
    Beta,
    ReleaseCandidate,
}

impl PreRelease {
    fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "a" | "alpha" => PreRelease::Alpha,
            "b" | "beta" => PreRelease::Beta,
            _ => PreRelease::ReleaseCandidate,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            PreRelease::Alpha => "a",
            PreRelease::Beta => "b",
            PreRelease::ReleaseCandidate => "rc",
        }
    }
}

/// One dot-separated segment of a local version label.
///
/// Alphanumeric segments sort before numeric ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocalSegment {
    Text(String),
    Number(u64),
}

impl fmt::Display for LocalSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalSegment::Text(s) => f.write_str(s),
            LocalSegment::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A parsed package version.
///
/// # Example
///
/// ```
/// use optdeps::Version;
///
/// let v: Version = "1.0-Alpha-1".parse().unwrap();
/// assert_eq!(v.to_string(), "1.0a1");
/// assert!(v < "1.0".parse::<Version>().unwrap());
/// assert_eq!(
///     "1.0".parse::<Version>().unwrap(),
///     "1.0.0".parse::<Version>().unwrap()
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Version {
    epoch: u64,
    release: Vec<u64>,
    pre: Option<(PreRelease, u64)>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Option<Vec<LocalSegment>>,
}

/// Position of the pre-release component in the ordering.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
enum PreKey {
    /// `1.0.dev0` sorts before `1.0a0`.
    DevOnly,
    Pre(PreRelease, u64),
    Final,
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
enum DevKey {
    Dev(u64),
    Final,
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
struct SortKey<'a> {
    epoch: u64,
    release: &'a [u64],
    pre: PreKey,
    post: Option<u64>,
    dev: DevKey,
    local: Option<&'a [LocalSegment]>,
}

impl Version {
    /// Parse a version string.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || OptDepsError::InvalidVersion {
            version: input.to_string(),
        };
        let caps = RE_VERSION.captures(input).ok_or_else(invalid)?;

        let number = |caps: &Captures, group: &str| -> Result<Option<u64>> {
            caps.name(group)
                .map(|m| m.as_str().parse::<u64>().map_err(|_| invalid()))
                .transpose()
        };

        let epoch = number(&caps, "epoch")?.unwrap_or(0);

        let release = caps["release"]
            .split('.')
            .map(|part| part.parse::<u64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>>>()?;

        let pre = match caps.name("pre_l") {
            Some(label) => Some((
                PreRelease::from_label(label.as_str()),
                number(&caps, "pre_n")?.unwrap_or(0),
            )),
            None => None,
        };

        let post = if caps.name("post").is_some() {
            Some(
                number(&caps, "post_n1")?
                    .or(number(&caps, "post_n2")?)
                    .unwrap_or(0),
            )
        } else {
            None
        };

        let dev = if caps.name("dev").is_some() {
            Some(number(&caps, "dev_n")?.unwrap_or(0))
        } else {
            None
        };

        let local = match caps.name("local") {
            Some(m) => Some(
                RE_LOCAL_SEPARATOR
                    .split(m.as_str())
                    .map(|part| {
                        if part.bytes().all(|b| b.is_ascii_digit()) {
                            part.parse::<u64>()
                                .map(LocalSegment::Number)
                                .map_err(|_| invalid())
                        } else {
                            Ok(LocalSegment::Text(part.to_ascii_lowercase()))
                        }
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            None => None,
        };

        Ok(Self {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }

    /// Version epoch, `0` unless written as `N!`.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Release components as written (`1.0` has two components).
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    /// First release component.
    pub fn major(&self) -> u64 {
        self.component(0)
    }

    /// Second release component, `0` when absent.
    pub fn minor(&self) -> u64 {
        self.component(1)
    }

    /// Third release component, `0` when absent.
    pub fn micro(&self) -> u64 {
        self.component(2)
    }

    fn component(&self, index: usize) -> u64 {
        self.release.get(index).copied().unwrap_or(0)
    }

    pub fn pre(&self) -> Option<(PreRelease, u64)> {
        self.pre
    }

    pub fn post(&self) -> Option<u64> {
        self.post
    }

    pub fn dev(&self) -> Option<u64> {
        self.dev
    }

    pub fn local(&self) -> Option<&[LocalSegment]> {
        self.local.as_deref()
    }

    /// Whether this is a pre-release or a dev release.
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    pub fn is_postrelease(&self) -> bool {
        self.post.is_some()
    }

    pub fn is_devrelease(&self) -> bool {
        self.dev.is_some()
    }

    /// The version without its local label.
    pub fn public(&self) -> Version {
        Version {
            local: None,
            ..self.clone()
        }
    }

    /// Epoch and release only (`1!2.0rc1.post3` becomes `1!2.0`).
    pub fn base_version(&self) -> Version {
        Version {
            epoch: self.epoch,
            release: self.release.clone(),
            pre: None,
            post: None,
            dev: None,
            local: None,
        }
    }

    fn sort_key(&self) -> SortKey<'_> {
        let significant = self
            .release
            .iter()
            .rposition(|&n| n != 0)
            .map_or(0, |i| i + 1);

        let pre = match (self.pre, self.post, self.dev) {
            (None, None, Some(_)) => PreKey::DevOnly,
            (None, _, _) => PreKey::Final,
            (Some((phase, n)), _, _) => PreKey::Pre(phase, n),
        };

        let dev = match self.dev {
            Some(n) => DevKey::Dev(n),
            None => DevKey::Final,
        };

        SortKey {
            epoch: self.epoch,
            release: &self.release[..significant],
            pre,
            post: self.post,
            dev,
            local: self.local.as_deref(),
        }
    }
}

impl FromStr for Version {
    type Err = OptDepsError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        let release = self
            .release
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&release)?;
        if let Some((phase, n)) = self.pre {
            write!(f, "{}{}", phase.as_str(), n)?;
        }
        if let Some(n) = self.post {
            write!(f, ".post{}", n)?;
        }
        if let Some(n) = self.dev {
            write!(f, ".dev{}", n)?;
        }
        if let Some(local) = &self.local {
            let label = local
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(".");
            write!(f, "+{}", label)?;
        }
        Ok(())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sort_key().hash(state);
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
