//! Injected run configuration.
//!
//! Everything the preflight routine would otherwise read from the process
//! (working directory, `NVM_DIR`, verbosity) lives in [`CheckConfig`], so
//! the decision logic can be driven from tests with explicit values.

use crate::config::manifest::MANIFEST_FILE;
use crate::ui::OutputMode;
use std::path::{Path, PathBuf};

/// Default version-pin file name, relative to the project root.
pub const PIN_FILE: &str = ".nvmrc";

/// Environment variable naming the nvm installation directory.
pub const NVM_DIR_ENV: &str = "NVM_DIR";

/// Shell used to source `nvm.sh`.
pub const DEFAULT_SHELL: &str = "bash";

/// Configuration for a single preflight run.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Project root; relative paths resolve against it.
    pub project_root: PathBuf,

    /// Path to the project manifest.
    pub manifest_path: PathBuf,

    /// Path to the version-pin file.
    pub pin_file_path: PathBuf,

    /// nvm installation directory, if known.
    pub nvm_dir: Option<PathBuf>,

    /// Whether to consult nvm at all.
    pub use_nvm: bool,

    /// Shell used to source `nvm.sh`.
    pub shell: String,

    /// Reporter verbosity.
    pub output_mode: OutputMode,
}

impl CheckConfig {
    /// Default configuration for a project root.
    ///
    /// `nvm_dir` is left unset; callers fill it from `NVM_DIR` if they want
    /// the version manager to be found.
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            manifest_path: project_root.join(MANIFEST_FILE),
            pin_file_path: project_root.join(PIN_FILE),
            nvm_dir: None,
            use_nvm: true,
            shell: DEFAULT_SHELL.to_string(),
            output_mode: OutputMode::Normal,
        }
    }

    /// Set the manifest path; relative paths resolve against the project root.
    pub fn with_manifest(mut self, path: &Path) -> Self {
        self.manifest_path = self.resolve(path);
        self
    }

    /// Set the pin file path; relative paths resolve against the project root.
    pub fn with_pin_file(mut self, path: &Path) -> Self {
        self.pin_file_path = self.resolve(path);
        self
    }

    /// Set the nvm installation directory.
    pub fn with_nvm_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.nvm_dir = dir;
        self
    }

    /// Set the output mode.
    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    /// Read `NVM_DIR` from the process environment.
    pub fn nvm_dir_from_env() -> Option<PathBuf> {
        std::env::var_os(NVM_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    /// File name of the pin file, for messages.
    pub fn pin_file_name(&self) -> String {
        self.pin_file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| PIN_FILE.to_string())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_against_project_root() {
        let config = CheckConfig::new(Path::new("/work/app"));
        assert_eq!(config.manifest_path, PathBuf::from("/work/app/package.json"));
        assert_eq!(config.pin_file_path, PathBuf::from("/work/app/.nvmrc"));
        assert!(config.nvm_dir.is_none());
        assert!(config.use_nvm);
        assert_eq!(config.shell, "bash");
        assert_eq!(config.output_mode, OutputMode::Normal);
    }

    #[test]
    fn relative_overrides_join_project_root() {
        let config = CheckConfig::new(Path::new("/work/app"))
            .with_manifest(Path::new("sub/package.json"))
            .with_pin_file(Path::new(".node-version"));
        assert_eq!(
            config.manifest_path,
            PathBuf::from("/work/app/sub/package.json")
        );
        assert_eq!(config.pin_file_path, PathBuf::from("/work/app/.node-version"));
        assert_eq!(config.pin_file_name(), ".node-version");
    }

    #[test]
    fn absolute_overrides_are_kept() {
        let config = CheckConfig::new(Path::new("/work/app"))
            .with_manifest(Path::new("/elsewhere/package.json"));
        assert_eq!(config.manifest_path, PathBuf::from("/elsewhere/package.json"));
    }

    #[test]
    fn builder_sets_nvm_dir_and_mode() {
        let config = CheckConfig::new(Path::new("/work/app"))
            .with_nvm_dir(Some(PathBuf::from("/opt/nvm")))
            .with_output_mode(OutputMode::Verbose);
        assert_eq!(config.nvm_dir, Some(PathBuf::from("/opt/nvm")));
        assert_eq!(config.output_mode, OutputMode::Verbose);
    }
}
