//! Guarded command execution.
//!
//! The analysis itself is an external command; projlock only decides whether
//! it may start. The child inherits stdio so its output streams straight to
//! the operator.

use crate::error::{ProjlockError, Result};
use std::process::Command;
use std::time::{Duration, Instant};

/// The command a run executes under the project lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl GuardedCommand {
    /// Build from trailing CLI arguments (`-- program arg...`).
    pub fn from_args(argv: &[String]) -> Result<Self> {
        let (program, args) = argv.split_first().ok_or_else(|| {
            ProjlockError::UserError(
                "no command given.\n\nUsage: projlock run [OPTIONS] -- <command> [args...]"
                    .to_string(),
            )
        })?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// Build from a single command string, split with shell quoting rules.
    pub fn parse(command: &str) -> Result<Self> {
        let argv = shell_words::split(command).map_err(|e| {
            ProjlockError::UserError(format!(
                "failed to parse command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                command, e
            ))
        })?;
        Self::from_args(&argv)
    }

    /// The command line, quoted for display.
    pub fn display(&self) -> String {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.program.as_str());
        argv.extend(self.args.iter().map(String::as_str));
        shell_words::join(argv)
    }
}

/// Outcome of a guarded command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code of the process (None if terminated by a signal).
    pub exit_code: Option<i32>,
    /// Wall-clock duration of the run.
    pub duration: Duration,
}

impl CommandResult {
    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Run `command` to completion with inherited stdio.
pub fn execute(command: &GuardedCommand) -> Result<CommandResult> {
    tracing::info!(command = %command.display(), "starting guarded command");

    let start_time = Instant::now();
    let status = Command::new(&command.program)
        .args(&command.args)
        .status()
        .map_err(|e| {
            ProjlockError::CommandFailed(format!(
                "failed to execute '{}': {}\n\
                 Fix: ensure the command is installed and in PATH.",
                command.program, e
            ))
        })?;

    let result = CommandResult {
        exit_code: status.code(),
        duration: start_time.elapsed(),
    };
    tracing::info!(
        exit_code = ?result.exit_code,
        elapsed = %crate::duration::label(u64::try_from(result.duration.as_millis()).unwrap_or(u64::MAX)),
        "guarded command finished"
    );
    Ok(result)
}
