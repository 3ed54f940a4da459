//! engine-check CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use engine_check::cli::{CheckCommand, Cli, Command};
use engine_check::ui::{ConsoleUI, UserInterface};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("engine_check=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("engine_check=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("engine-check starting with args: {:?}", cli);

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let project_root = cli
        .project
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    let config = cli.to_config(&project_root);
    let mut ui = ConsoleUI::new(config.output_mode);
    let command = CheckCommand::new(config);

    match command.execute(&mut ui) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            tracing::debug!("Check failed: {}", e.detail());
            ui.error(&format!("Error: {}", e));
            ui.error("Aborting");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
