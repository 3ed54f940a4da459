//! Toolchain requirement checking.
//!
//! This module decides whether the installed runtime and package managers
//! satisfy the ranges a project declares in `engines`.
//!
//! # Modules
//!
//! - [`constraint`] - npm-style range parsing and satisfaction
//! - [`probe`] - Tool definitions and version probes
//! - [`checker`] - Per-tool constraint checks
//! - [`version_manager`] - Runtime switching through nvm

pub mod checker;
pub mod constraint;
pub mod probe;
pub mod version_manager;

pub use checker::{CheckOutcome, ConstraintChecker};
pub use constraint::{parse_reported_version, satisfies, ConstraintError, VersionReq};
pub use probe::{CommandProbe, StaticProbe, Tool, VersionProbe};
pub use version_manager::{
    resolve_desired_version, sanitize_version, switch_runtime, DesiredVersion, Nvm,
    VersionManager, VersionSource,
};
