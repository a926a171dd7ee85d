//! `projlock run`: execute a command under the project lock.

use super::CommandEnv;
use crate::cli::RunArgs;
use projlock::config::Config;
use projlock::coordinator::{LockOutcome, ProjectLock, SkipReason};
use projlock::error::Result;
use projlock::exit_codes;
use projlock::runner::{self, GuardedCommand};
use std::path::Path;

pub(super) fn cmd_run(args: RunArgs, config_path: Option<&Path>) -> Result<i32> {
    let mut config = CommandEnv::load(config_path)?.config;
    apply_run_args(&mut config, &args)?;
    config.validate()?;
    let env = CommandEnv::from_config(config);

    let command = match &args.command {
        Some(line) => GuardedCommand::parse(line)?,
        None => GuardedCommand::from_args(&args.argv)?,
    };

    run_guarded(&env, &command)
}

/// Layer `-D` properties, then explicit flags, over the loaded config.
pub(super) fn apply_run_args(config: &mut Config, args: &RunArgs) -> Result<()> {
    for define in &args.defines {
        config.apply_define(define)?;
    }
    if let Some(project) = &args.project {
        config.project_key = Some(project.clone());
    }
    if let Some(name) = &args.name {
        config.project_name = Some(name.clone());
    }
    if args.dry_run {
        config.dry_run = true;
    }
    if args.force {
        config.force_analysis = true;
    }
    Ok(())
}

/// Run `command` under the lock described by `env`; returns the exit code.
pub(super) fn run_guarded(env: &CommandEnv, command: &GuardedCommand) -> Result<i32> {
    let project = env.config.project();
    let mut lock = ProjectLock::new(&env.store, project.clone(), env.config.run_settings())
        .with_event_log(env.events.clone());

    let result = lock.run(|outcome| {
        match outcome {
            LockOutcome::Skipped(SkipReason::BlankProjectKey) => {
                tracing::warn!("no project key configured; running without a lock")
            }
            LockOutcome::Skipped(SkipReason::DryRun) => {
                tracing::info!("dry run; running without a lock")
            }
            LockOutcome::Acquired => tracing::info!(project = %project, "project lock acquired"),
            LockOutcome::Forced { .. } => tracing::info!(project = %project, "project lock forced"),
        }
        runner::execute(command)
    })?;

    Ok(result.exit_code.unwrap_or(exit_codes::COMMAND_FAILURE))
}
