//! Runtime version switching through nvm.
//!
//! nvm is a shell function defined by sourcing `$NVM_DIR/nvm.sh`, so it is
//! never on PATH for a child process. Every invocation therefore runs a
//! shell that sources the script first.
//!
//! The switch is best effort: an absent or failing nvm is reported and the
//! run falls back to checking the global toolchain directly.

use crate::config::{CheckConfig, Manifest, NVM_DIR_ENV};
use crate::error::{CheckError, Result};
use crate::requirements::probe::Tool;
use crate::shell::{execute, CommandOptions, CommandResult};
use crate::ui::UserInterface;
use std::fs;
use std::path::{Path, PathBuf};

/// Script that defines the `nvm` shell function.
pub const NVM_SCRIPT: &str = "nvm.sh";

/// A tool that can switch the active runtime version.
pub trait VersionManager {
    /// Manager name for messages.
    fn name(&self) -> &str;

    /// Confirm the manager is installed and working; returns its version.
    fn self_check(&self) -> Result<String>;

    /// Switch the active runtime to `version`, letting the manager's own
    /// output reach the terminal.
    fn use_version(&self, version: &str) -> Result<()>;
}

/// The nvm version manager.
#[derive(Debug, Clone)]
pub struct Nvm {
    nvm_dir: Option<PathBuf>,
    shell: String,
    cwd: Option<PathBuf>,
    quiet: bool,
}

impl Nvm {
    /// Create an adapter for the nvm installed in `nvm_dir`, invoked via `shell`.
    pub fn new(nvm_dir: Option<PathBuf>, shell: impl Into<String>) -> Self {
        Self {
            nvm_dir,
            shell: shell.into(),
            cwd: None,
            quiet: false,
        }
    }

    /// Create an adapter from run configuration.
    pub fn from_config(config: &CheckConfig) -> Self {
        Self {
            nvm_dir: config.nvm_dir.clone(),
            shell: config.shell.clone(),
            cwd: Some(config.project_root.clone()),
            quiet: !config.output_mode.shows_status(),
        }
    }

    /// Path of `nvm.sh`, if the install directory holds one.
    pub fn script_path(&self) -> Result<PathBuf> {
        let dir = self
            .nvm_dir
            .as_deref()
            .ok_or_else(|| self.error(format!("{} is not set", NVM_DIR_ENV)))?;
        locate_manager_script(dir, NVM_SCRIPT)
            .ok_or_else(|| self.error(format!("{} not found in {}", NVM_SCRIPT, dir.display())))
    }

    /// Run `nvm <args>` in a shell that has sourced `nvm.sh`.
    fn run_nvm(&self, args: &[&str], capture: bool) -> Result<CommandResult> {
        let script = self.script_path()?;
        let dir = script.parent().map(Path::to_path_buf).unwrap_or_default();
        tracing::debug!("Using {}", script.display());

        let mut options = if capture {
            CommandOptions::captured()
        } else {
            CommandOptions::inherited()
        };
        options.cwd = self.cwd.clone();
        options
            .env
            .insert(NVM_DIR_ENV.to_string(), dir.to_string_lossy().to_string());

        let body = format!(". \"$NVM_DIR/{}\" && nvm \"$@\"", NVM_SCRIPT);
        let mut shell_args = vec!["-c", body.as_str(), "nvm"];
        shell_args.extend_from_slice(args);

        let result = execute(&self.shell, &shell_args, &options)
            .map_err(|e| self.error(e.detail()))?;
        if result.success {
            Ok(result)
        } else {
            Err(self.error(format!(
                "'nvm {}' exited with code {:?}{}",
                args.join(" "),
                result.exit_code,
                if result.stderr.trim().is_empty() {
                    String::new()
                } else {
                    format!(": {}", result.stderr.trim())
                }
            )))
        }
    }

    fn error(&self, message: String) -> CheckError {
        CheckError::ToolInvocation {
            tool: self.name().to_string(),
            message,
        }
    }
}

impl VersionManager for Nvm {
    fn name(&self) -> &str {
        "nvm"
    }

    fn self_check(&self) -> Result<String> {
        let result = self.run_nvm(&["--version"], true)?;
        Ok(result.stdout.trim().to_string())
    }

    /// In quiet mode nvm's own output is captured and only logged.
    fn use_version(&self, version: &str) -> Result<()> {
        let result = self.run_nvm(&["use", version], self.quiet)?;
        if self.quiet {
            tracing::debug!("nvm use: {}", result.stdout.trim());
        }
        Ok(())
    }
}

/// Find a manager's script inside its install root.
///
/// Returns the script path only if it exists as a file.
pub fn locate_manager_script(install_root: &Path, script: &str) -> Option<PathBuf> {
    let candidate = install_root.join(script);
    if candidate.is_file() {
        Some(candidate)
    } else {
        None
    }
}

/// Where the desired runtime version came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    /// The version-pin file (`.nvmrc`).
    PinFile,
    /// `engines.node` in the manifest.
    Manifest,
}

/// The runtime version to ask the manager for, before sanitizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredVersion {
    pub raw: String,
    pub source: VersionSource,
}

impl DesiredVersion {
    /// The version with comparator characters removed.
    pub fn sanitized(&self) -> String {
        sanitize_version(&self.raw)
    }
}

/// Remove every `>`, `=`, `^` and `~` from a version string.
///
/// Ranges are not resolved: `>=1.0.0 <2.0.0` becomes `1.0.0 <2.0.0`.
pub fn sanitize_version(version: &str) -> String {
    version
        .chars()
        .filter(|c| !matches!(c, '>' | '=' | '^' | '~'))
        .collect()
}

/// Pick the runtime version to switch to.
///
/// The pin file wins when it exists and is non-empty after trimming;
/// otherwise `engines.node` is used. Reports which source was chosen.
pub fn resolve_desired_version(
    pin_file: &Path,
    manifest: &Manifest,
    ui: &mut dyn UserInterface,
) -> Option<DesiredVersion> {
    let pin_name = pin_file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| pin_file.display().to_string());

    match fs::read_to_string(pin_file) {
        Ok(content) if !content.trim().is_empty() => {
            let raw = content.trim().to_string();
            ui.message(&format!("Using Node version from {}: {}", pin_name, raw));
            return Some(DesiredVersion {
                raw,
                source: VersionSource::PinFile,
            });
        }
        Ok(_) => tracing::debug!("{} is empty", pin_file.display()),
        Err(e) => tracing::debug!("Could not read {}: {}", pin_file.display(), e),
    }

    if let Some(node) = manifest.engine_constraint(Tool::Node) {
        ui.message(&format!("Using Node version from package.json: {}", node));
        return Some(DesiredVersion {
            raw: node.as_str().to_string(),
            source: VersionSource::Manifest,
        });
    }

    ui.message(&format!(
        "{} not found and package.json doesn't specify a Node version. Global version will be used.",
        pin_name
    ));
    None
}

/// Try to switch the active runtime through `manager`.
///
/// Returns `true` only if the switch command succeeded. Every failure is
/// reported and turned into `false`.
pub fn switch_runtime(
    manager: &dyn VersionManager,
    config: &CheckConfig,
    manifest: &Manifest,
    ui: &mut dyn UserInterface,
) -> bool {
    let name = manager.name().to_uppercase();

    match manager.self_check() {
        Ok(version) => tracing::debug!("{} {} detected", manager.name(), version),
        Err(e) => {
            report_unavailable(&name, &e, ui);
            return false;
        }
    }

    let Some(desired) = resolve_desired_version(&config.pin_file_path, manifest, ui) else {
        return false;
    };

    let sanitized = desired.sanitized();
    tracing::debug!(
        "Switching runtime with {}: '{}' (from '{}')",
        manager.name(),
        sanitized,
        desired.raw
    );

    match manager.use_version(&sanitized) {
        Ok(()) => true,
        Err(e) => {
            report_unavailable(&name, &e, ui);
            false
        }
    }
}

fn report_unavailable(name: &str, error: &CheckError, ui: &mut dyn UserInterface) {
    ui.detail(&format!(
        "{} not found or error using {}: {}",
        name,
        name,
        error.detail()
    ));
    ui.warning(&format!("{} not found. Using global Node version.", name));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{MockUI, OutputMode};
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Version manager double recording the versions it was asked to use.
    struct FakeManager {
        installed: bool,
        use_succeeds: bool,
        used: RefCell<Vec<String>>,
    }

    impl FakeManager {
        fn new(installed: bool, use_succeeds: bool) -> Self {
            Self {
                installed,
                use_succeeds,
                used: RefCell::new(Vec::new()),
            }
        }
    }

    impl VersionManager for FakeManager {
        fn name(&self) -> &str {
            "nvm"
        }

        fn self_check(&self) -> Result<String> {
            if self.installed {
                Ok("0.39.7".to_string())
            } else {
                Err(CheckError::ToolInvocation {
                    tool: "nvm".into(),
                    message: "NVM_DIR is not set".into(),
                })
            }
        }

        fn use_version(&self, version: &str) -> Result<()> {
            self.used.borrow_mut().push(version.to_string());
            if self.use_succeeds {
                Ok(())
            } else {
                Err(CheckError::ToolInvocation {
                    tool: "nvm".into(),
                    message: "N/A: version \"99\" is not yet installed".into(),
                })
            }
        }
    }

    fn manifest(json: &str) -> Manifest {
        json.parse().unwrap()
    }

    fn config_in(temp: &TempDir) -> CheckConfig {
        CheckConfig::new(temp.path())
    }

    #[test]
    fn sanitize_strips_comparator_characters() {
        assert_eq!(sanitize_version(">=18.0.0"), "18.0.0");
        assert_eq!(sanitize_version("^3.0.0"), "3.0.0");
        assert_eq!(sanitize_version("~1.2"), "1.2");
        assert_eq!(sanitize_version("18.2.0"), "18.2.0");
        assert_eq!(sanitize_version("lts/*"), "lts/*");
    }

    #[test]
    fn sanitize_does_not_resolve_complex_ranges() {
        assert_eq!(sanitize_version(">=1.0.0 <2.0.0"), "1.0.0 <2.0.0");
        assert_eq!(sanitize_version("^16 || ^18"), "16 || 18");
    }

    #[test]
    fn pin_file_takes_precedence() {
        let temp = TempDir::new().unwrap();
        let pin = temp.path().join(".nvmrc");
        fs::write(&pin, "18.2.0\n").unwrap();
        let mut ui = MockUI::new();

        let desired =
            resolve_desired_version(&pin, &manifest(r#"{"engines":{"node":">=20"}}"#), &mut ui)
                .unwrap();

        assert_eq!(desired.raw, "18.2.0");
        assert_eq!(desired.source, VersionSource::PinFile);
        assert!(ui.has_message("Using Node version from .nvmrc: 18.2.0"));
    }

    #[test]
    fn blank_pin_file_falls_back_to_manifest() {
        let temp = TempDir::new().unwrap();
        let pin = temp.path().join(".nvmrc");
        fs::write(&pin, "  \n").unwrap();
        let mut ui = MockUI::new();

        let desired =
            resolve_desired_version(&pin, &manifest(r#"{"engines":{"node":">=20"}}"#), &mut ui)
                .unwrap();

        assert_eq!(desired.raw, ">=20");
        assert_eq!(desired.source, VersionSource::Manifest);
        assert!(ui.has_message("Using Node version from package.json: >=20"));
    }

    #[test]
    fn no_source_reports_global_fallback() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        let desired = resolve_desired_version(
            &temp.path().join(".nvmrc"),
            &manifest(r#"{"engines":{"npm":">=9"}}"#),
            &mut ui,
        );

        assert!(desired.is_none());
        assert!(ui.has_message(
            ".nvmrc not found and package.json doesn't specify a Node version. Global version will be used."
        ));
    }

    #[test]
    fn switch_uses_sanitized_pin_version() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".nvmrc"), "18.2.0").unwrap();
        let manager = FakeManager::new(true, true);
        let mut ui = MockUI::new();

        let switched = switch_runtime(
            &manager,
            &config_in(&temp),
            &manifest(r#"{"engines":{}}"#),
            &mut ui,
        );

        assert!(switched);
        assert_eq!(*manager.used.borrow(), vec!["18.2.0".to_string()]);
    }

    #[test]
    fn switch_sanitizes_manifest_range() {
        let temp = TempDir::new().unwrap();
        let manager = FakeManager::new(true, true);
        let mut ui = MockUI::new();

        let switched = switch_runtime(
            &manager,
            &config_in(&temp),
            &manifest(r#"{"engines":{"node":">=18.0.0"}}"#),
            &mut ui,
        );

        assert!(switched);
        assert_eq!(*manager.used.borrow(), vec!["18.0.0".to_string()]);
    }

    #[test]
    fn missing_manager_is_not_used() {
        let temp = TempDir::new().unwrap();
        let manager = FakeManager::new(false, true);
        let mut ui = MockUI::with_mode(OutputMode::Verbose);

        let switched = switch_runtime(
            &manager,
            &config_in(&temp),
            &manifest(r#"{"engines":{"node":">=18"}}"#),
            &mut ui,
        );

        assert!(!switched);
        assert!(manager.used.borrow().is_empty());
        assert!(ui.has_warning("NVM not found. Using global Node version."));
        assert!(ui.has_detail("NVM_DIR is not set"));
    }

    #[test]
    fn failed_switch_is_not_used() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".nvmrc"), "99").unwrap();
        let manager = FakeManager::new(true, false);
        let mut ui = MockUI::new();

        let switched = switch_runtime(
            &manager,
            &config_in(&temp),
            &manifest(r#"{"engines":{}}"#),
            &mut ui,
        );

        assert!(!switched);
        assert!(ui.has_warning("NVM not found. Using global Node version."));
    }

    #[test]
    fn no_version_source_is_not_used() {
        let temp = TempDir::new().unwrap();
        let manager = FakeManager::new(true, true);
        let mut ui = MockUI::new();

        let switched = switch_runtime(
            &manager,
            &config_in(&temp),
            &manifest(r#"{"engines":{"yarn":"^1"}}"#),
            &mut ui,
        );

        assert!(!switched);
        assert!(manager.used.borrow().is_empty());
    }

    #[test]
    fn quiet_config_captures_nvm_output() {
        let temp = TempDir::new().unwrap();
        let quiet = Nvm::from_config(&config_in(&temp).with_output_mode(OutputMode::Quiet));
        let normal = Nvm::from_config(&config_in(&temp));

        assert!(quiet.quiet);
        assert!(!normal.quiet);
    }

    #[test]
    fn nvm_without_dir_fails_self_check() {
        let nvm = Nvm::new(None, "sh");
        match nvm.self_check().unwrap_err() {
            CheckError::ToolInvocation { tool, message } => {
                assert_eq!(tool, "nvm");
                assert!(message.contains("NVM_DIR"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nvm_with_empty_dir_fails_self_check() {
        let temp = TempDir::new().unwrap();
        let nvm = Nvm::new(Some(temp.path().to_path_buf()), "sh");
        assert!(nvm.script_path().is_err());
        assert!(nvm.self_check().is_err());
    }

    #[test]
    fn locate_manager_script_requires_file() {
        let temp = TempDir::new().unwrap();
        assert!(locate_manager_script(temp.path(), NVM_SCRIPT).is_none());

        fs::write(temp.path().join(NVM_SCRIPT), "nvm() { :; }\n").unwrap();
        assert_eq!(
            locate_manager_script(temp.path(), NVM_SCRIPT),
            Some(temp.path().join(NVM_SCRIPT))
        );
    }

    #[cfg(unix)]
    #[test]
    fn nvm_sources_script_before_running() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(NVM_SCRIPT),
            "nvm() {\n  if [ \"$1\" = \"--version\" ]; then echo 0.39.7; return 0; fi\n  [ \"$1\" = use ] && [ \"$2\" = 18.2.0 ]\n}\n",
        )
        .unwrap();
        let nvm = Nvm::new(Some(temp.path().to_path_buf()), "sh");

        assert_eq!(nvm.self_check().unwrap(), "0.39.7");
        assert!(nvm.use_version("18.2.0").is_ok());
        assert!(nvm.use_version("16.0.0").is_err());
    }
}
