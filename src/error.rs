//! Error types for optdeps operations.
//!
//! This module defines [`OptDepsError`], the error type returned by the
//! declaration and query APIs, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Declaration mistakes (`InvalidName`, `DuplicateIdentifier`) surface
//!   immediately so the call site can be fixed
//! - `NotInstalled` is recoverable: check `is_installed` first or match on it
//! - Lookup never fails: unreadable or unparsable metadata counts as absent
//! - Use `anyhow::Error` (via `OptDepsError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for optdeps operations.
#[derive(Debug, Error)]
pub enum OptDepsError {
    /// Identifier or explicit name cannot be turned into a package name.
    #[error("Invalid package name: {name:?}")]
    InvalidName { name: String },

    /// The same symbolic identifier was declared twice.
    #[error("Optional dependency '{identifier}' is declared more than once")]
    DuplicateIdentifier { identifier: String },

    /// Query for an identifier that was never declared.
    #[error("Unknown optional dependency '{identifier}'")]
    UnknownIdentifier { identifier: String },

    /// A version was requested for a dependency that is not installed.
    #[error("{identifier} is not installed (package '{name}')")]
    NotInstalled { identifier: String, name: String },

    /// String does not follow the version grammar.
    #[error("Invalid version: {version:?}")]
    InvalidVersion { version: String },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for optdeps operations.
pub type Result<T> = std::result::Result<T, OptDepsError>;
