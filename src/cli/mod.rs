//! CLI argument parsing for projlock.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Projlock: one analysis per project at a time, across worker processes.
///
/// Before a run starts, projlock claims the project's lock in a shared store.
/// A second run of the same project is turned away with the age of the
/// existing lock, so stale locks left by crashed runs are easy to spot and
/// can be overridden with `projlock.forceAnalysis=true`.
#[derive(Parser, Debug)]
#[command(name = "projlock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: ./projlock.yaml when present).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for projlock.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a command while holding the project lock.
    ///
    /// Fails with exit code 4 if another run of the same project holds
    /// the lock. Otherwise exits with the command's own exit code.
    Run(RunArgs),

    /// Lock management commands.
    ///
    /// List, inspect, or clear project locks.
    Lock(LockCommand),
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Project key the lock is derived from.
    #[arg(short, long)]
    pub project: Option<String>,

    /// Project display name used in messages.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Rehearsal run: skip locking entirely.
    #[arg(long)]
    pub dry_run: bool,

    /// Seize the lock even if another run holds it.
    #[arg(long)]
    pub force: bool,

    /// Property override, e.g. -D projlock.forceAnalysis=true.
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE")]
    pub defines: Vec<String>,

    /// Command line to run, as a single shell-quoted string.
    #[arg(short, long, conflicts_with = "argv")]
    pub command: Option<String>,

    /// Command to run, after `--`.
    #[arg(last = true, value_name = "COMMAND")]
    pub argv: Vec<String>,
}

/// Lock subcommand wrapper.
#[derive(Parser, Debug)]
pub struct LockCommand {
    #[command(subcommand)]
    pub action: LockAction,
}

/// Available lock actions.
#[derive(Subcommand, Debug)]
pub enum LockAction {
    /// List all held locks.
    ///
    /// Shows owner, age, and whether each lock looks stale.
    List,

    /// Show whether a project's lock is held.
    Status(LockStatusArgs),

    /// Clear a project's lock.
    ///
    /// Requires --force flag to prevent accidental clearing.
    Clear(LockClearArgs),
}

/// Arguments for the `lock status` command.
#[derive(Parser, Debug)]
pub struct LockStatusArgs {
    /// Project key whose lock to inspect.
    pub project: String,
}

/// Arguments for the `lock clear` command.
#[derive(Parser, Debug)]
pub struct LockClearArgs {
    /// Project key whose lock should be cleared.
    pub project: String,

    /// Force clearing the lock (required for safety).
    #[arg(long)]
    pub force: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
