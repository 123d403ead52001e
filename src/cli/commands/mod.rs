//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations against one metadata source.

pub mod check;
pub mod dispatcher;
pub mod inspect;
pub mod paths;
pub mod version;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
