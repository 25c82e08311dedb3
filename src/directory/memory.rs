//! In-memory scheduler directory.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{DirectoryError, SchedulerDirectory};
use crate::scheduler::Scheduler;

/// Thread-safe directory backed by a `HashMap`.
#[derive(Default)]
pub struct InMemoryDirectory {
    schedulers: RwLock<HashMap<String, Arc<dyn Scheduler>>>,
}

impl InMemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchedulerDirectory for InMemoryDirectory {
    fn register(&self, name: &str, scheduler: Arc<dyn Scheduler>) -> Result<(), DirectoryError> {
        let mut schedulers = self
            .schedulers
            .write()
            .map_err(|_| DirectoryError::LockPoisoned)?;
        if schedulers.contains_key(name) {
            return Err(DirectoryError::AlreadyRegistered(name.to_string()));
        }
        schedulers.insert(name.to_string(), scheduler);
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<Option<Arc<dyn Scheduler>>, DirectoryError> {
        let schedulers = self
            .schedulers
            .read()
            .map_err(|_| DirectoryError::LockPoisoned)?;
        Ok(schedulers.get(name).cloned())
    }

    fn remove(&self, name: &str) -> Result<bool, DirectoryError> {
        let mut schedulers = self
            .schedulers
            .write()
            .map_err(|_| DirectoryError::LockPoisoned)?;
        Ok(schedulers.remove(name).is_some())
    }

    fn names(&self) -> Result<Vec<String>, DirectoryError> {
        let schedulers = self
            .schedulers
            .read()
            .map_err(|_| DirectoryError::LockPoisoned)?;
        let mut names: Vec<_> = schedulers.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
