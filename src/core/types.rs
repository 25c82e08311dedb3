//! Core identifier types for jobs and triggers.
//!
//! Keys are a `(name, group)` pair. They are used as map and set keys on both
//! sides of the remote boundary, so they are cheap to clone, hashable and
//! serializable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Group assigned to keys created without an explicit group.
pub const DEFAULT_GROUP: &str = "DEFAULT";

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobKey {
    name: String,
    group: String,
}

/// Unique identifier for a trigger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriggerKey {
    name: String,
    group: String,
}

impl JobKey {
    /// Create a new JobKey in the default group.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_group(name, DEFAULT_GROUP)
    }

    /// Create a new JobKey in the given group.
    pub fn with_group(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
        }
    }

    /// Get the key name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the key group.
    pub fn group(&self) -> &str {
        &self.group
    }
}

impl From<&str> for JobKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for JobKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl TriggerKey {
    /// Create a new TriggerKey in the default group.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_group(name, DEFAULT_GROUP)
    }

    /// Create a new TriggerKey in the given group.
    pub fn with_group(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
        }
    }

    /// Get the key name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the key group.
    pub fn group(&self) -> &str {
        &self.group
    }
}

impl From<&str> for TriggerKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TriggerKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.name)
    }
}

impl fmt::Display for TriggerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.name)
    }
}
