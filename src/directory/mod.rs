//! Name-keyed directory of schedulers.
//!
//! Processes that host several schedulers (or proxies to them) register each
//! under its name so other components can look it up. A proxy removes its own
//! name once the remote engine has been shut down.

mod memory;

pub use memory::InMemoryDirectory;

use std::sync::Arc;
use thiserror::Error;

use crate::scheduler::Scheduler;

/// Errors that can occur during directory operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// A scheduler is already registered under the name.
    #[error("scheduler already registered: {0}")]
    AlreadyRegistered(String),

    /// Directory lock was poisoned.
    #[error("directory lock poisoned")]
    LockPoisoned,
}

/// Directory of schedulers keyed by name.
pub trait SchedulerDirectory: Send + Sync {
    /// Register a scheduler under `name`.
    fn register(&self, name: &str, scheduler: Arc<dyn Scheduler>) -> Result<(), DirectoryError>;

    /// Look up the scheduler registered under `name`.
    fn lookup(&self, name: &str) -> Result<Option<Arc<dyn Scheduler>>, DirectoryError>;

    /// Remove `name`; returns whether it was registered.
    fn remove(&self, name: &str) -> Result<bool, DirectoryError>;

    /// All registered names, sorted.
    fn names(&self) -> Result<Vec<String>, DirectoryError>;
}
