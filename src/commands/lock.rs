//! `projlock lock`: inspect and clear project locks.

use super::CommandEnv;
use crate::cli::{LockClearArgs, LockStatusArgs};
use projlock::coordinator::lock_key;
use projlock::error::{ProjlockError, Result};
use projlock::events::{Event, EventAction};
use projlock::semaphore::{HeldLock, SemaphoreStore};
use serde_json::json;

pub(super) fn cmd_lock_list(env: &CommandEnv) -> Result<()> {
    let locks = env.store.held()?;

    if locks.is_empty() {
        println!("No active locks.");
        return Ok(());
    }

    println!("Active locks ({}):", locks.len());
    println!();

    let stale_minutes = env.config.lock_stale_minutes;
    for lock in &locks {
        print_lock(lock, stale_minutes, "  ");
        println!();
    }

    let stale_count = locks.iter().filter(|l| l.is_stale(stale_minutes)).count();
    if stale_count > 0 {
        println!(
            "Note: {} lock(s) are stale. Use `projlock lock clear <project> --force` to clear, \
             or re-run with projlock.forceAnalysis=true.",
            stale_count
        );
    }

    Ok(())
}

pub(super) fn cmd_lock_status(env: &CommandEnv, args: LockStatusArgs) -> Result<()> {
    match find_held(env, &args.project)? {
        Some(lock) => {
            println!("Project '{}' is locked:", args.project);
            print_lock(&lock, env.config.lock_stale_minutes, "  ");
        }
        None => println!("Project '{}' is not locked.", args.project),
    }
    Ok(())
}

pub(super) fn cmd_lock_clear(env: &CommandEnv, args: LockClearArgs) -> Result<()> {
    if !args.force {
        return Err(ProjlockError::UserError(format!(
            "refusing to clear lock without --force flag.\n\n\
             Clearing a lock while its analysis is still running lets two runs overlap.\n\
             Only clear locks if you are certain the lock holder has crashed.\n\n\
             To clear the lock, run:\n  projlock lock clear {} --force",
            args.project
        )));
    }

    let cleared = find_held(env, &args.project)?.ok_or_else(|| {
        ProjlockError::UserError(format!("project '{}' is not locked", args.project))
    })?;

    env.store.release(&lock_key(&args.project))?;

    let stale_minutes = env.config.lock_stale_minutes;
    env.events.record(
        &Event::new(EventAction::LockCleared)
            .with_key(&cleared.key)
            .with_details(json!({
                "project": args.project,
                "owner": cleared.owner,
                "age_minutes": cleared.age().num_minutes(),
                "was_stale": cleared.is_stale(stale_minutes),
                "force": args.force,
            })),
    );

    println!("Cleared lock for project '{}'.", args.project);
    println!();
    println!("Lock details:");
    print_lock(&cleared, stale_minutes, "  ");

    Ok(())
}

fn find_held(env: &CommandEnv, project: &str) -> Result<Option<HeldLock>> {
    env.store.claim(&lock_key(project))
}

fn print_lock(lock: &HeldLock, stale_minutes: u32, indent: &str) {
    println!("{}Key:        {}", indent, lock.key);
    println!("{}Owner:      {}", indent, lock.owner);
    if let Some(pid) = lock.pid {
        println!("{}PID:        {}", indent, pid);
    }
    println!(
        "{}Since:      {}",
        indent,
        lock.locked_since.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("{}Age:        {}", indent, lock.age_label());
    if lock.is_stale(stale_minutes) {
        println!("{}Status:     STALE (exceeds {} min threshold)", indent, stale_minutes);
    }
}
