//! External command execution.

pub mod command;

pub use command::{
    capture_trimmed, display_command, execute, CommandOptions, CommandResult,
};
