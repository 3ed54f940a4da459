//! Configuration loading.
//!
//! - [`manifest`] - `package.json` parsing and `engines` lookup
//! - [`settings`] - Paths and options injected into a preflight run

pub mod manifest;
pub mod settings;

pub use manifest::{EngineConstraint, Manifest, MANIFEST_FILE};
pub use settings::{CheckConfig, DEFAULT_SHELL, NVM_DIR_ENV, PIN_FILE};
