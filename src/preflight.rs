//! The preflight run.
//!
//! Order of operations:
//!
//! 1. Load the manifest and require an `engines` section
//! 2. Try to switch the runtime through the version manager
//! 3. If no switch happened, check `node` and `npm` directly
//! 4. Always check `yarn` (or report that it isn't declared)
//!
//! The first failure ends the run; nothing is retried.

use crate::config::{CheckConfig, Manifest};
use crate::error::Result;
use crate::requirements::{
    switch_runtime, CheckOutcome, ConstraintChecker, Tool, VersionManager, VersionProbe,
};
use crate::ui::UserInterface;

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreflightReport {
    /// Whether the version manager switched the runtime.
    pub switched_runtime: bool,
    /// Outcome per tool that was considered, in check order.
    pub outcomes: Vec<(Tool, CheckOutcome)>,
}

impl PreflightReport {
    /// Outcome for `tool`, if it was considered.
    pub fn outcome(&self, tool: Tool) -> Option<&CheckOutcome> {
        self.outcomes
            .iter()
            .find(|(t, _)| *t == tool)
            .map(|(_, outcome)| outcome)
    }
}

/// Load the manifest from `config` and run every check.
pub fn run_preflight(
    config: &CheckConfig,
    probe: &dyn VersionProbe,
    version_manager: Option<&dyn VersionManager>,
    ui: &mut dyn UserInterface,
) -> Result<PreflightReport> {
    let manifest = Manifest::load(&config.manifest_path)?;
    run_with_manifest(config, &manifest, probe, version_manager, ui)
}

/// Run every check against an already-loaded manifest.
pub fn run_with_manifest(
    config: &CheckConfig,
    manifest: &Manifest,
    probe: &dyn VersionProbe,
    version_manager: Option<&dyn VersionManager>,
    ui: &mut dyn UserInterface,
) -> Result<PreflightReport> {
    manifest.require_engines()?;

    let switched_runtime = match version_manager {
        Some(manager) if config.use_nvm => switch_runtime(manager, config, manifest, ui),
        _ => {
            tracing::debug!("Version manager disabled");
            false
        }
    };

    let checker = ConstraintChecker::new(probe);
    let mut report = PreflightReport {
        switched_runtime,
        outcomes: Vec::new(),
    };

    if switched_runtime {
        ui.success("Verified versions (through NVM).");
    } else {
        for tool in [Tool::Node, Tool::Npm] {
            let outcome = checker.check(tool, manifest.engine_constraint(tool), ui)?;
            report.outcomes.push((tool, outcome));
        }
    }

    let outcome = checker.check(Tool::Yarn, manifest.engine_constraint(Tool::Yarn), ui)?;
    report.outcomes.push((Tool::Yarn, outcome));

    Ok(report)
}
