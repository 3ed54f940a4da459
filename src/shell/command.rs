//! External command execution.

use crate::error::{CheckError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output (empty when not captured).
    pub stdout: String,

    /// Standard error (empty when not captured).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Capture stdout and stderr (if false, both inherit from parent).
    pub capture: bool,
}

impl CommandOptions {
    /// Options that capture output.
    pub fn captured() -> Self {
        Self {
            capture: true,
            ..Default::default()
        }
    }

    /// Options that pass output straight through to the terminal.
    pub fn inherited() -> Self {
        Self::default()
    }
}

/// Render a program and its arguments for logs and error messages.
pub fn display_command(program: &str, args: &[&str]) -> String {
    let mut rendered = program.to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

/// Execute a program with arguments, without an intermediate shell.
///
/// Spawn failures become [`CheckError::ToolInvocation`]; a non-zero exit is
/// reported through [`CommandResult::success`] so callers decide what it means.
pub fn execute(program: &str, args: &[&str], options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    let rendered = display_command(program, args);
    tracing::debug!("Executing: {}", rendered);

    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    if options.capture {
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
    }

    let output = cmd.output().map_err(|e| CheckError::ToolInvocation {
        tool: program.to_string(),
        message: format!("could not run '{}': {}", rendered, e),
    })?;

    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    tracing::debug!(
        "'{}' exited with {:?} after {:?}",
        rendered,
        output.status.code(),
        duration
    );

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

/// Execute a program, capture its stdout and return it trimmed.
///
/// Spawn failures and non-zero exits are [`CheckError::ToolInvocation`]
/// errors naming `tool`.
pub fn capture_trimmed(
    tool: &str,
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
) -> Result<String> {
    let options = CommandOptions {
        cwd: cwd.map(Path::to_path_buf),
        capture: true,
        ..Default::default()
    };
    let result = execute(program, args, &options).map_err(|e| match e {
        CheckError::ToolInvocation { message, .. } => CheckError::ToolInvocation {
            tool: tool.to_string(),
            message,
        },
        other => other,
    })?;
    if !result.success {
        return Err(CheckError::ToolInvocation {
            tool: tool.to_string(),
            message: format!(
                "'{}' exited with code {:?}: {}",
                display_command(program, args),
                result.exit_code,
                result.stderr.trim()
            ),
        });
    }
    Ok(result.stdout.trim().to_string())
}
