//! engine-check - Node toolchain preflight for `package.json` engines.
//!
//! Before a project's install or build steps run, engine-check verifies that
//! the active `node`, `npm` and `yarn` satisfy the ranges declared in the
//! manifest's `engines` section, optionally switching the runtime through
//! nvm first.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Manifest loading and run configuration
//! - [`error`] - Error types and result aliases
//! - [`preflight`] - The check sequence
//! - [`requirements`] - Version ranges, probes and the nvm adapter
//! - [`shell`] - External command execution
//! - [`ui`] - Reporter output
//!
//! # Example
//!
//! ```
//! use engine_check::requirements::satisfies;
//!
//! assert!(satisfies("20.1.0", ">=18.0.0"));
//! assert!(!satisfies("v16.0.0", "^18 || ^20"));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod preflight;
pub mod requirements;
pub mod shell;
pub mod ui;

pub use error::{CheckError, ErrorKind, Result};
