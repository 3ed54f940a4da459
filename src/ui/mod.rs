//! Reporter output.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`ConsoleUI`] for terminal and CI usage
//! - [`MockUI`] for capturing output in tests
//!
//! # Example
//!
//! ```
//! use engine_check::ui::{ConsoleUI, OutputMode, UserInterface};
//!
//! let mut ui = ConsoleUI::new(OutputMode::Quiet);
//! ui.message("No required Yarn version specified");
//! ```

pub mod console;
pub mod mock;
pub mod output;
pub mod theme;

pub use console::ConsoleUI;
pub use mock::MockUI;
pub use output::OutputMode;
pub use theme::{should_use_colors, CheckTheme};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a progress/status message.
    fn message(&mut self, msg: &str);

    /// Display a line that only matters in verbose mode.
    fn detail(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Check if verbose details are shown.
    fn is_verbose(&self) -> bool {
        self.output_mode().shows_details()
    }
}
