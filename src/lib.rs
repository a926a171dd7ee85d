//! Projlock: per-project exclusive locking for analysis runs.
//!
//! A run claims its project's semaphore in a shared store before it starts
//! and releases it when it ends. The store is the only synchronization point
//! between worker processes; see [`coordinator::ProjectLock`].

pub mod config;
pub mod coordinator;
pub mod duration;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod logging;
pub mod project;
pub mod runner;
pub mod semaphore;

#[cfg(test)]
mod test_support;
