//! Line-oriented console reporter.

use super::theme::CheckTheme;
use super::{OutputMode, UserInterface};

/// Reporter that writes progress to stdout and failures to stderr.
///
/// Output is plain lines with no spinners or cursor movement, so it reads
/// the same in a terminal and in CI logs.
pub struct ConsoleUI {
    mode: OutputMode,
    theme: CheckTheme,
}

impl ConsoleUI {
    /// Create a console reporter, styling output when the terminal allows it.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            theme: CheckTheme::detect(),
        }
    }

    /// Create with an explicit theme (for testing).
    pub fn with_theme(mode: OutputMode, theme: CheckTheme) -> Self {
        Self { mode, theme }
    }
}

impl UserInterface for ConsoleUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn detail(&mut self, msg: &str) {
        if self.mode.shows_details() {
            println!("{}", self.theme.dim.apply_to(msg));
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.success.apply_to(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.warning.apply_to(msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.error.apply_to(msg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_ui_reports_mode() {
        let ui = ConsoleUI::with_theme(OutputMode::Quiet, CheckTheme::plain());
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn console_ui_accepts_all_message_kinds() {
        let mut ui = ConsoleUI::with_theme(OutputMode::Verbose, CheckTheme::plain());
        ui.message("No required Yarn version specified");
        ui.detail("npm required: '>=9' - current: '9.5.0'");
        ui.success("Verified versions (through NVM).");
        ui.warning("NVM not found. Using global Node version.");
        ui.error("Error: something");
    }
}
