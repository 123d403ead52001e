//! Resolved installed state and the comparison protocol.
//!
//! Every lookup ends in a [`ResolvedState`]: either the installed version or
//! the [`ResolvedState::NotInstalled`] sentinel. The sentinel is absorbing:
//! it never compares true against a version and [`chain`] never turns it
//! back into an installed state.

use std::fmt;

use serde::Serialize;

use crate::version::Version;

/// Outcome of checking whether a package is installed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "state", content = "version", rename_all = "snake_case")]
pub enum ResolvedState {
    /// Installed at the given version.
    Installed(Version),
    /// Absent, or installed with a version that could not be parsed.
    NotInstalled,
}

impl ResolvedState {
    pub fn is_installed(&self) -> bool {
        matches!(self, ResolvedState::Installed(_))
    }

    /// The installed version, if any.
    pub fn version(&self) -> Option<&Version> {
        match self {
            ResolvedState::Installed(v) => Some(v),
            ResolvedState::NotInstalled => None,
        }
    }

    /// Compare the installed version against `other`.
    ///
    /// `NotInstalled` yields `false` for every operator, `Eq` included.
    pub fn compare(&self, op: CompareOp, other: &Version) -> bool {
        match self {
            ResolvedState::Installed(v) => op.apply(v, other),
            ResolvedState::NotInstalled => false,
        }
    }

    /// Keep this state only if every check passed.
    ///
    /// See [`chain`].
    pub fn chain<I>(self, checks: I) -> ResolvedState
    where
        I: IntoIterator<Item = bool>,
    {
        chain(self, checks)
    }
}

impl From<Option<Version>> for ResolvedState {
    fn from(version: Option<Version>) -> Self {
        match version {
            Some(v) => ResolvedState::Installed(v),
            None => ResolvedState::NotInstalled,
        }
    }
}

impl fmt::Display for ResolvedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedState::Installed(v) => write!(f, "{}", v),
            ResolvedState::NotInstalled => f.write_str("not installed"),
        }
    }
}

/// Comparison operator tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
}

impl CompareOp {
    /// Evaluate `lhs <op> rhs`.
    pub fn apply(self, lhs: &Version, rhs: &Version) -> bool {
        match self {
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ge => lhs >= rhs,
            CompareOp::Gt => lhs > rhs,
        }
    }

    /// Operator symbol (`<`, `<=`, `==`, `>=`, `>`).
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Eq => "==",
            CompareOp::Ge => ">=",
            CompareOp::Gt => ">",
        }
    }

    /// Parse an operator symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Le),
            "==" => Some(CompareOp::Eq),
            ">=" => Some(CompareOp::Ge),
            ">" => Some(CompareOp::Gt),
            _ => None,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Collapse "installed AND check AND check ..." into one state.
///
/// Returns `NotInstalled` if `initial` is `NotInstalled` or any check is
/// false, otherwise `initial` unchanged. Checks are plain booleans, already
/// evaluated by the caller.
///
/// # Example
///
/// ```
/// use optdeps::{chain, ResolvedState, Version};
///
/// let v: Version = "1.0".parse().unwrap();
/// let two: Version = "2.0".parse().unwrap();
/// let state = ResolvedState::Installed(v.clone());
///
/// assert_eq!(chain(state.clone(), [v < two]), state);
/// assert_eq!(chain(state, [v > two]), ResolvedState::NotInstalled);
/// assert_eq!(chain(ResolvedState::NotInstalled, [true]), ResolvedState::NotInstalled);
/// ```
pub fn chain<I>(initial: ResolvedState, checks: I) -> ResolvedState
where
    I: IntoIterator<Item = bool>,
{
    if initial.is_installed() && checks.into_iter().all(|ok| ok) {
        initial
    } else {
        ResolvedState::NotInstalled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_OPS: [CompareOp; 5] = [
        CompareOp::Lt,
        CompareOp::Le,
        CompareOp::Eq,
        CompareOp::Ge,
        CompareOp::Gt,
    ];

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn installed_state_reports_version() {
        let state = ResolvedState::Installed(v("24.0"));
        assert!(state.is_installed());
        assert_eq!(state.version(), Some(&v("24.0")));
    }

    #[test]
    fn not_installed_has_no_version() {
        assert!(!ResolvedState::NotInstalled.is_installed());
        assert!(ResolvedState::NotInstalled.version().is_none());
    }

    #[test]
    fn installed_delegates_to_version_ordering() {
        let state = ResolvedState::Installed(v("1.5"));
        let bound = v("1.2");
        for op in ALL_OPS {
            assert_eq!(state.compare(op, &bound), op.apply(&v("1.5"), &bound));
        }
        assert!(state.compare(CompareOp::Gt, &bound));
        assert!(!state.compare(CompareOp::Lt, &bound));
    }

    #[test]
    fn not_installed_is_false_for_every_operator() {
        for bound in ["0", "0.1", "999"] {
            for op in ALL_OPS {
                assert!(!ResolvedState::NotInstalled.compare(op, &v(bound)));
            }
        }
    }

    #[test]
    fn operator_symbols_roundtrip() {
        for op in ALL_OPS {
            assert_eq!(CompareOp::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(CompareOp::from_symbol("~="), None);
    }

    #[test]
    fn chain_keeps_installed_when_all_checks_pass() {
        let state = ResolvedState::Installed(v("1.0"));
        assert_eq!(chain(state.clone(), [true, true]), state);
    }

    #[test]
    fn chain_with_no_checks_is_identity() {
        let state = ResolvedState::Installed(v("1.0"));
        assert_eq!(chain(state.clone(), []), state);
    }

    #[test]
    fn chain_drops_to_not_installed_on_failed_check() {
        let state = ResolvedState::Installed(v("1.0"));
        assert_eq!(chain(state, [true, false]), ResolvedState::NotInstalled);
    }

    #[test]
    fn chain_is_absorbing_for_not_installed() {
        assert_eq!(
            ResolvedState::NotInstalled.chain([true]),
            ResolvedState::NotInstalled
        );
        assert_eq!(
            ResolvedState::NotInstalled.chain([false]),
            ResolvedState::NotInstalled
        );
    }

    #[test]
    fn display_forms() {
        assert_eq!(ResolvedState::Installed(v("v2.0")).to_string(), "2.0");
        assert_eq!(ResolvedState::NotInstalled.to_string(), "not installed");
    }

    #[test]
    fn serializes_tagged() {
        let json = serde_json::to_value(ResolvedState::Installed(v("1.0"))).unwrap();
        assert_eq!(json["state"], "installed");
        assert_eq!(json["version"], "1.0");

        let json = serde_json::to_value(ResolvedState::NotInstalled).unwrap();
        assert_eq!(json["state"], "not_installed");
    }
}
