//! Tool version probes.
//!
//! A [`VersionProbe`] answers "what version of this tool is installed?".
//! [`CommandProbe`] asks the real tools; [`StaticProbe`] returns fixed
//! strings so the checker can be exercised without spawning processes.
//!
//! # Example
//!
//! ```
//! use engine_check::requirements::{StaticProbe, Tool, VersionProbe};
//!
//! let probe = StaticProbe::new().with(Tool::Npm, "9.5.0");
//! assert_eq!(probe.report_version(Tool::Npm).unwrap(), "9.5.0");
//! assert!(probe.report_version(Tool::Yarn).is_err());
//! ```

use crate::error::{CheckError, Result};
use crate::shell::{capture_trimmed, display_command};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// A toolchain component whose version can be constrained in `engines`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// The JavaScript runtime.
    Node,
    /// The primary package manager.
    Npm,
    /// The alternate package manager.
    Yarn,
}

impl Tool {
    /// Every tool, in check order.
    pub const ALL: [Tool; 3] = [Tool::Node, Tool::Npm, Tool::Yarn];

    /// Key under `engines` in `package.json`.
    pub fn engine_key(&self) -> &'static str {
        match self {
            Tool::Node => "node",
            Tool::Npm => "npm",
            Tool::Yarn => "yarn",
        }
    }

    /// Name used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            Tool::Node => "node",
            Tool::Npm => "npm",
            Tool::Yarn => "Yarn",
        }
    }

    /// Executable to run.
    pub fn program(&self) -> &'static str {
        match self {
            Tool::Node => "node",
            #[cfg(windows)]
            Tool::Npm => "npm.cmd",
            #[cfg(not(windows))]
            Tool::Npm => "npm",
            #[cfg(windows)]
            Tool::Yarn => "yarn.cmd",
            #[cfg(not(windows))]
            Tool::Yarn => "yarn",
        }
    }

    /// Arguments that make the tool print its version.
    pub fn version_args(&self) -> &'static [&'static str] {
        match self {
            Tool::Node => &["--version"],
            Tool::Npm | Tool::Yarn => &["-v"],
        }
    }

    /// The full version command, for messages.
    pub fn version_command(&self) -> String {
        display_command(self.program(), self.version_args())
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Source of installed tool versions.
pub trait VersionProbe {
    /// Report the installed version of `tool`, trimmed.
    ///
    /// Fails with [`CheckError::ToolInvocation`] if the tool can't be queried.
    fn report_version(&self, tool: Tool) -> Result<String>;
}

/// Probe that runs each tool's version command.
#[derive(Debug, Clone, Default)]
pub struct CommandProbe {
    cwd: Option<PathBuf>,
}

impl CommandProbe {
    /// Create a probe running in the current directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run version commands in `dir`.
    ///
    /// Package managers such as Yarn report a per-project version, so this
    /// should be the project root.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(dir.into()),
        }
    }
}

impl VersionProbe for CommandProbe {
    fn report_version(&self, tool: Tool) -> Result<String> {
        let version = capture_trimmed(
            tool.label(),
            tool.program(),
            tool.version_args(),
            self.cwd.as_deref(),
        )?;
        tracing::debug!("{} reported version '{}'", tool.label(), version);
        Ok(version)
    }
}

/// Probe returning fixed versions, recording which tools were asked.
#[derive(Debug, Default)]
pub struct StaticProbe {
    versions: HashMap<Tool, String>,
    queried: RefCell<Vec<Tool>>,
}

impl StaticProbe {
    /// Create a probe that knows no tools.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `version` for `tool`.
    pub fn with(mut self, tool: Tool, version: &str) -> Self {
        self.versions.insert(tool, version.to_string());
        self
    }

    /// Tools queried so far, in order.
    pub fn queried(&self) -> Vec<Tool> {
        self.queried.borrow().clone()
    }

    /// Whether `tool` has been queried.
    pub fn was_queried(&self, tool: Tool) -> bool {
        self.queried.borrow().contains(&tool)
    }
}

impl VersionProbe for StaticProbe {
    fn report_version(&self, tool: Tool) -> Result<String> {
        self.queried.borrow_mut().push(tool);
        self.versions
            .get(&tool)
            .map(|v| v.trim().to_string())
            .ok_or_else(|| CheckError::ToolInvocation {
                tool: tool.label().to_string(),
                message: format!("{} is not installed", tool.program()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_metadata() {
        assert_eq!(Tool::Node.engine_key(), "node");
        assert_eq!(Tool::Yarn.engine_key(), "yarn");
        assert_eq!(Tool::Yarn.label(), "Yarn");
        assert_eq!(Tool::Npm.to_string(), "npm");
        assert_eq!(Tool::Node.version_args(), &["--version"]);
        assert_eq!(Tool::Npm.version_args(), &["-v"]);
        assert_eq!(Tool::ALL.len(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn version_command_renders_program_and_args() {
        assert_eq!(Tool::Node.version_command(), "node --version");
        assert_eq!(Tool::Yarn.version_command(), "yarn -v");
    }

    #[test]
    fn static_probe_reports_trimmed_versions() {
        let probe = StaticProbe::new().with(Tool::Node, "v20.1.0\n");
        assert_eq!(probe.report_version(Tool::Node).unwrap(), "v20.1.0");
    }

    #[test]
    fn static_probe_missing_tool_is_invocation_error() {
        let probe = StaticProbe::new();
        match probe.report_version(Tool::Yarn).unwrap_err() {
            CheckError::ToolInvocation { tool, .. } => assert_eq!(tool, "Yarn"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn static_probe_records_queries() {
        let probe = StaticProbe::new().with(Tool::Npm, "9.5.0");
        let _ = probe.report_version(Tool::Npm);
        let _ = probe.report_version(Tool::Yarn);
        assert_eq!(probe.queried(), vec![Tool::Npm, Tool::Yarn]);
        assert!(probe.was_queried(Tool::Yarn));
        assert!(!probe.was_queried(Tool::Node));
    }
}
