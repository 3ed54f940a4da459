//! The check command.
//!
//! [`CheckCommand`] wires the real process-backed probe and nvm adapter
//! into the preflight routine.

use crate::config::CheckConfig;
use crate::error::Result;
use crate::preflight::run_preflight;
use crate::requirements::{CommandProbe, Nvm, VersionManager};
use crate::ui::UserInterface;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }
}

/// Runs the preflight check against the live toolchain.
pub struct CheckCommand {
    config: CheckConfig,
}

impl CheckCommand {
    /// Create a check command for a run configuration.
    pub fn new(config: CheckConfig) -> Self {
        Self { config }
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let probe = CommandProbe::in_dir(&self.config.project_root);
        let nvm = Nvm::from_config(&self.config);
        let manager: Option<&dyn VersionManager> = if self.config.use_nvm {
            Some(&nvm)
        } else {
            None
        };

        let report = run_preflight(&self.config, &probe, manager, ui)?;
        tracing::debug!(
            "Preflight finished (switched runtime: {}, tools considered: {})",
            report.switched_runtime,
            report.outcomes.len()
        );

        Ok(CommandResult::success())
    }
}
