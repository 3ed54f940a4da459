//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::config::{CheckConfig, NVM_DIR_ENV};
use crate::ui::OutputMode;

/// Positional value that turns on verbose output.
pub const VERBOSE_MODE: &str = "verbose";

/// engine-check - Verify the Node toolchain against package.json engines.
#[derive(Debug, Parser)]
#[command(name = "engine-check")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pass `verbose` to print required and current versions
    #[arg(value_name = "MODE")]
    pub mode: Option<String>,

    /// Path to project root (overrides current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Path to the manifest (default: package.json in the project root)
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Path to the version pin file (default: .nvmrc in the project root)
    #[arg(long, value_name = "FILE")]
    pub pin_file: Option<PathBuf>,

    /// nvm installation directory
    #[arg(long, value_name = "DIR", env = NVM_DIR_ENV)]
    pub nvm_dir: Option<PathBuf>,

    /// Shell used to source nvm.sh
    #[arg(long)]
    pub shell: Option<String>,

    /// Skip nvm and check versions directly
    #[arg(long)]
    pub no_nvm: bool,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Minimal output; only errors are printed
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Whether verbose output was requested, by flag or positional mode.
    pub fn wants_verbose(&self) -> bool {
        self.verbose || self.mode.as_deref() == Some(VERBOSE_MODE)
    }

    /// Output mode selected by the flags. `--quiet` wins.
    pub fn output_mode(&self) -> OutputMode {
        if self.quiet {
            OutputMode::Quiet
        } else if self.wants_verbose() {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }

    /// Build the run configuration for a project root.
    pub fn to_config(&self, project_root: &Path) -> CheckConfig {
        let mut config = CheckConfig::new(project_root)
            .with_nvm_dir(
                self.nvm_dir
                    .clone()
                    .filter(|dir| !dir.as_os_str().is_empty()),
            )
            .with_output_mode(self.output_mode());

        if let Some(manifest) = &self.manifest {
            config = config.with_manifest(manifest);
        }
        if let Some(pin_file) = &self.pin_file {
            config = config.with_pin_file(pin_file);
        }
        if let Some(shell) = &self.shell {
            config.shell = shell.clone();
        }
        config.use_nvm = !self.no_nvm;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["engine-check"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_is_normal_mode() {
        let cli = parse(&[]);
        assert!(cli.mode.is_none());
        assert_eq!(cli.output_mode(), OutputMode::Normal);
    }

    #[test]
    fn verbose_positional_enables_verbose() {
        let cli = parse(&["verbose"]);
        assert!(cli.wants_verbose());
        assert_eq!(cli.output_mode(), OutputMode::Verbose);
    }

    #[test]
    fn other_positional_is_ignored() {
        let cli = parse(&["loud"]);
        assert_eq!(cli.output_mode(), OutputMode::Normal);
    }

    #[test]
    fn verbose_flag_enables_verbose() {
        assert_eq!(parse(&["-v"]).output_mode(), OutputMode::Verbose);
    }

    #[test]
    fn quiet_overrides_verbose() {
        assert_eq!(
            parse(&["verbose", "--quiet"]).output_mode(),
            OutputMode::Quiet
        );
    }

    #[test]
    fn to_config_applies_overrides() {
        let cli = parse(&[
            "--manifest",
            "web/package.json",
            "--pin-file",
            ".node-version",
            "--nvm-dir",
            "/opt/nvm",
            "--shell",
            "zsh",
            "--no-nvm",
        ]);
        let config = cli.to_config(Path::new("/work/app"));

        assert_eq!(
            config.manifest_path,
            PathBuf::from("/work/app/web/package.json")
        );
        assert_eq!(config.pin_file_path, PathBuf::from("/work/app/.node-version"));
        assert_eq!(config.nvm_dir, Some(PathBuf::from("/opt/nvm")));
        assert_eq!(config.shell, "zsh");
        assert!(!config.use_nvm);
    }

    #[test]
    fn to_config_defaults() {
        let cli = parse(&[]);
        let config = cli.to_config(Path::new("/work/app"));

        assert_eq!(config.manifest_path, PathBuf::from("/work/app/package.json"));
        assert_eq!(config.pin_file_path, PathBuf::from("/work/app/.nvmrc"));
        assert!(config.use_nvm);
        assert_eq!(config.shell, "bash");
    }
}
