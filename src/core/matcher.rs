//! Group matchers used by key queries and group pause/resume.

use serde::{Deserialize, Serialize};

use super::types::{JobKey, TriggerKey};

/// Selects keys by group name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum GroupMatcher {
    /// Group equals the value.
    Equals(String),
    /// Group starts with the value.
    StartsWith(String),
    /// Group ends with the value.
    EndsWith(String),
    /// Group contains the value.
    Contains(String),
    /// Any group.
    AnyGroup,
}

impl GroupMatcher {
    /// Match a single group by name.
    pub fn group(name: impl Into<String>) -> Self {
        GroupMatcher::Equals(name.into())
    }

    /// Whether `group` is selected.
    pub fn matches_group(&self, group: &str) -> bool {
        match self {
            GroupMatcher::Equals(v) => group == v,
            GroupMatcher::StartsWith(v) => group.starts_with(v.as_str()),
            GroupMatcher::EndsWith(v) => group.ends_with(v.as_str()),
            GroupMatcher::Contains(v) => group.contains(v.as_str()),
            GroupMatcher::AnyGroup => true,
        }
    }

    /// Whether a job key is selected.
    pub fn matches_job(&self, key: &JobKey) -> bool {
        self.matches_group(key.group())
    }

    /// Whether a trigger key is selected.
    pub fn matches_trigger(&self, key: &TriggerKey) -> bool {
        self.matches_group(key.group())
    }
}
