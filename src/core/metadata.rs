//! Scheduler-level context, metadata, and executing-job snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::types::{JobKey, TriggerKey};

/// Shared key/value context the engine hands to every job.
pub type SchedulerContext = HashMap<String, Value>;

/// Descriptive snapshot of a scheduler instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerMetaData {
    pub scheduler_name: String,
    pub instance_id: String,
    pub version: String,
    /// When the scheduler was started; `None` if it never was.
    pub running_since: Option<DateTime<Utc>>,
    pub in_standby_mode: bool,
    pub shutdown: bool,
    pub jobs_executed: u64,
    pub thread_pool_size: usize,
    pub persistent_store: bool,
    pub clustered: bool,
}

impl SchedulerMetaData {
    /// Whether the scheduler has been started.
    pub fn is_started(&self) -> bool {
        self.running_since.is_some()
    }

    /// One-line human readable summary.
    pub fn summary(&self) -> String {
        let state = if self.shutdown {
            "shut down"
        } else if self.in_standby_mode {
            "in standby"
        } else if self.is_started() {
            "running"
        } else {
            "not started"
        };
        format!(
            "scheduler '{}' ({}) v{} is {}; {} jobs executed, {} threads",
            self.scheduler_name,
            self.instance_id,
            self.version,
            state,
            self.jobs_executed,
            self.thread_pool_size
        )
    }
}

/// A job that is running right now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutingJob {
    /// Unique id of this firing, usable with `interrupt_instance`.
    pub fire_instance_id: String,
    pub job_key: JobKey,
    pub trigger_key: TriggerKey,
    pub fire_time: DateTime<Utc>,
    pub scheduled_fire_time: Option<DateTime<Utc>>,
    pub refire_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> SchedulerMetaData {
        SchedulerMetaData {
            scheduler_name: "reporting".into(),
            instance_id: "node-1".into(),
            version: "1.0.0".into(),
            running_since: None,
            in_standby_mode: false,
            shutdown: false,
            jobs_executed: 0,
            thread_pool_size: 4,
            persistent_store: false,
            clustered: false,
        }
    }

    #[test]
    fn test_summary_not_started() {
        let md = metadata();
        assert!(!md.is_started());
        assert!(md.summary().contains("not started"));
    }

    #[test]
    fn test_summary_running() {
        let md = SchedulerMetaData {
            running_since: Some(Utc::now()),
            ..metadata()
        };
        assert!(md.is_started());
        assert!(md.summary().contains("is running"));
    }
}
