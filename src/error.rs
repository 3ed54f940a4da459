//! Error types for engine checks.
//!
//! This module defines [`CheckError`], the single error type returned by
//! the preflight routine, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every variant is fatal; the binary prints `Error: <message>` followed
//!   by `Aborting` and exits with status 1
//! - Benign skips (nvm absent, undeclared constraint) are never errors
//! - A constraint that can't be satisfied, including one that isn't a valid
//!   range, is a `ConstraintMismatch`

use std::path::PathBuf;
use thiserror::Error;

/// Broad classification of a [`CheckError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Manifest missing, unreadable, malformed or missing a required section.
    Config,
    /// An external tool could not be invoked or returned a failure.
    ToolInvocation,
    /// A reported version does not satisfy the declared constraint.
    ConstraintMismatch,
}

/// Core error type for engine checks.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Manifest file could not be read.
    #[error("Failed to read or parse package.json")]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest content is not a JSON object.
    #[error("Failed to read or parse package.json")]
    ManifestParse { path: PathBuf, message: String },

    /// Manifest has no `engines` section.
    #[error("No engines entry in package.json")]
    MissingEngines,

    /// Querying a tool for its version failed.
    #[error("Failed to check {tool} version")]
    ToolInvocation { tool: String, message: String },

    /// A tool's version does not satisfy the declared constraint.
    #[error("Required {tool} version '{required}' not satisfied. Current: '{current}'.")]
    ConstraintMismatch {
        tool: String,
        required: String,
        current: String,
    },
}

impl CheckError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ManifestUnreadable { .. }
            | Self::ManifestParse { .. }
            | Self::MissingEngines => ErrorKind::Config,
            Self::ConstraintMismatch { .. } => ErrorKind::ConstraintMismatch,
            Self::ToolInvocation { .. } => ErrorKind::ToolInvocation,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Underlying cause, for verbose and debug output.
    ///
    /// The display text of several variants is fixed wording; this returns
    /// the specific reason behind it.
    pub fn detail(&self) -> String {
        match self {
            Self::ManifestUnreadable { path, source } => {
                format!("{}: {}", path.display(), source)
            }
            Self::ManifestParse { path, message } => format!("{}: {}", path.display(), message),
            Self::ToolInvocation { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for engine checks.
pub type Result<T> = std::result::Result<T, CheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_errors_share_wording() {
        let unreadable = CheckError::ManifestUnreadable {
            path: PathBuf::from("package.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let parse = CheckError::ManifestParse {
            path: PathBuf::from("package.json"),
            message: "expected value".into(),
        };
        assert_eq!(unreadable.to_string(), "Failed to read or parse package.json");
        assert_eq!(parse.to_string(), "Failed to read or parse package.json");
    }

    #[test]
    fn missing_engines_is_config_error() {
        let err = CheckError::MissingEngines;
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(err.to_string(), "No engines entry in package.json");
    }

    #[test]
    fn mismatch_names_required_and_current() {
        let err = CheckError::ConstraintMismatch {
            tool: "node".into(),
            required: ">=18.0.0".into(),
            current: "16.0.0".into(),
        };
        assert_eq!(
            err.to_string(),
            "Required node version '>=18.0.0' not satisfied. Current: '16.0.0'."
        );
        assert_eq!(err.kind(), ErrorKind::ConstraintMismatch);
    }

    #[test]
    fn tool_invocation_displays_tool() {
        let err = CheckError::ToolInvocation {
            tool: "Yarn".into(),
            message: "No such file or directory".into(),
        };
        assert_eq!(err.to_string(), "Failed to check Yarn version");
        assert_eq!(err.kind(), ErrorKind::ToolInvocation);
    }

    #[test]
    fn detail_exposes_underlying_cause() {
        let err = CheckError::ToolInvocation {
            tool: "npm".into(),
            message: "could not run 'npm -v': No such file or directory".into(),
        };
        assert!(err.detail().contains("No such file or directory"));

        let err = CheckError::ManifestParse {
            path: PathBuf::from("package.json"),
            message: "EOF while parsing".into(),
        };
        assert_eq!(err.detail(), "package.json: EOF while parsing");

        assert_eq!(
            CheckError::MissingEngines.detail(),
            "No engines entry in package.json"
        );
    }

    #[test]
    fn every_error_exits_with_one() {
        assert_eq!(CheckError::MissingEngines.exit_code(), 1);
    }
}
