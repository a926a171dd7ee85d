//! Command implementations for projlock.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations.

mod lock;
mod run;

use crate::cli::{Cli, Command, LockAction, LockCommand};
use projlock::config::Config;
use projlock::error::Result;
use projlock::events::EventLog;
use projlock::semaphore::FileSemaphoreStore;
use std::path::{Path, PathBuf};

/// Dispatch a command to its implementation.
///
/// Returns the process exit code on success.
pub fn dispatch(cli: Cli) -> Result<i32> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Run(args) => run::cmd_run(args, config_path),
        Command::Lock(lock_cmd) => dispatch_lock(lock_cmd, config_path),
    }
}

/// Dispatch lock subcommands.
fn dispatch_lock(lock_cmd: LockCommand, config_path: Option<&Path>) -> Result<i32> {
    let env = CommandEnv::load(config_path)?;
    match lock_cmd.action {
        LockAction::List => lock::cmd_lock_list(&env),
        LockAction::Status(args) => lock::cmd_lock_status(&env, args),
        LockAction::Clear(args) => lock::cmd_lock_clear(&env, args),
    }?;
    Ok(projlock::exit_codes::SUCCESS)
}

/// Config plus the store and event log it points at.
pub(crate) struct CommandEnv {
    pub config: Config,
    pub store: FileSemaphoreStore,
    pub events: EventLog,
}

impl CommandEnv {
    /// Resolve config relative to the working directory.
    pub(crate) fn load(config_path: Option<&Path>) -> Result<Self> {
        Ok(Self::from_config(Config::discover(config_path)?))
    }

    pub(crate) fn from_config(config: Config) -> Self {
        let store_dir = PathBuf::from(&config.store_dir);
        let store = FileSemaphoreStore::new(&store_dir).with_default_wait(config.lock_wait_seconds);
        let events = EventLog::in_dir(&store_dir);
        Self {
            config,
            store,
            events,
        }
    }
}
