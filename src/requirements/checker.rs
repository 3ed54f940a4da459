//! Constraint checker.
//!
//! The `ConstraintChecker` compares each tool's reported version against
//! the range declared for it in `engines`.

use crate::config::EngineConstraint;
use crate::error::{CheckError, Result};
use crate::requirements::constraint::{parse_reported_version, VersionReq};
use crate::requirements::probe::{Tool, VersionProbe};
use crate::ui::UserInterface;

/// Result of checking a single tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// No constraint declared; the tool was not queried.
    NotDeclared,
    /// The reported version satisfies the declared range.
    Satisfied { required: String, current: String },
}

impl CheckOutcome {
    /// Whether the tool was actually checked.
    pub fn was_checked(&self) -> bool {
        matches!(self, Self::Satisfied { .. })
    }
}

/// Checks declared constraints against versions from a [`VersionProbe`].
pub struct ConstraintChecker<'a> {
    probe: &'a dyn VersionProbe,
}

impl<'a> ConstraintChecker<'a> {
    /// Create a checker backed by `probe`.
    pub fn new(probe: &'a dyn VersionProbe) -> Self {
        Self { probe }
    }

    /// Check one tool against its declared constraint.
    ///
    /// An undeclared constraint is reported and skipped. A probe failure is
    /// an error, and so is a constraint the reported version does not
    /// satisfy. A range that cannot be parsed, or a value that is not a
    /// range at all, is never satisfied.
    pub fn check(
        &self,
        tool: Tool,
        declared: Option<EngineConstraint<'_>>,
        ui: &mut dyn UserInterface,
    ) -> Result<CheckOutcome> {
        let Some(declared) = declared else {
            ui.message(&format!("No required {} version specified", tool.label()));
            return Ok(CheckOutcome::NotDeclared);
        };
        let required = declared.as_str().to_string();

        let current = self.probe.report_version(tool).map_err(|e| {
            tracing::debug!("{} version query failed: {}", tool.label(), e.detail());
            match e {
                CheckError::ToolInvocation { message, .. } => CheckError::ToolInvocation {
                    tool: tool.label().to_string(),
                    message,
                },
                other => other,
            }
        })?;

        ui.detail(&format!(
            "{} required: '{}' - current: '{}'",
            tool.label(),
            required,
            current
        ));

        let satisfied = match &declared {
            EngineConstraint::Range(range) => match VersionReq::parse(range) {
                Ok(req) => parse_reported_version(&current).is_some_and(|v| req.matches(&v)),
                Err(e) => {
                    tracing::debug!("{} range '{}' is not valid: {}", tool.label(), range, e);
                    false
                }
            },
            EngineConstraint::NotARange(rendered) => {
                tracing::debug!("{} constraint {} is not a string", tool.label(), rendered);
                false
            }
        };
        tracing::debug!(
            "{} '{}' against '{}': {}",
            tool.label(),
            current,
            required,
            if satisfied { "satisfied" } else { "not satisfied" }
        );

        if !satisfied {
            return Err(CheckError::ConstraintMismatch {
                tool: tool.label().to_string(),
                required,
                current,
            });
        }

        Ok(CheckOutcome::Satisfied { required, current })
    }
}
