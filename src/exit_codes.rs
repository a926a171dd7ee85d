//! Exit code constants for the projlock CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid config)
//! - 4: Lock acquisition failure (project already being analyzed)
//! - 5: Semaphore store failure
//! - 6: Guarded command could not be started
//!
//! When the guarded command itself runs to completion, `projlock run` exits
//! with the command's own exit code instead.

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid configuration.
pub const USER_ERROR: i32 = 1;

/// Lock acquisition failure: another run holds the project lock.
pub const LOCK_FAILURE: i32 = 4;

/// The semaphore store could not be read or written.
pub const STORE_FAILURE: i32 = 5;

/// The guarded command could not be spawned.
pub const COMMAND_FAILURE: i32 = 6;
