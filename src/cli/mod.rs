//! Command-line interface for engine-check.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`command`] - The check command

pub mod args;
pub mod command;

pub use args::{Cli, VERBOSE_MODE};
pub use command::{CheckCommand, Command, CommandResult};
