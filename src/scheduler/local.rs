//! Extension points that live inside the engine's own process.
//!
//! Job factories and listeners hold code, not data, so they cannot be shipped
//! to a remote engine. They are defined here so that the [`Scheduler`] API is
//! complete; a remote proxy rejects them.
//!
//! [`Scheduler`]: super::Scheduler

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::core::job::JobDetail;
use crate::core::matcher::GroupMatcher;
use crate::core::metadata::ExecutingJob;
use crate::core::trigger::Trigger;

/// A job failed while executing.
#[derive(Debug, Error)]
#[error("job execution failed: {message}")]
pub struct JobExecutionError {
    pub message: String,
    /// Ask the engine to fire the job again immediately.
    pub refire_immediately: bool,
}

/// Executable job implementation.
#[async_trait]
pub trait Job: Send + Sync {
    async fn execute(&self, execution: &ExecutingJob) -> Result<(), JobExecutionError>;
}

/// Creates job instances for fired triggers.
pub trait JobFactory: Send + Sync {
    fn new_job(&self, detail: &JobDetail) -> Result<Arc<dyn Job>, JobExecutionError>;
}

/// Observes job executions.
pub trait JobListener: Send + Sync {
    fn name(&self) -> &str;

    fn job_to_be_executed(&self, _execution: &ExecutingJob) {}

    fn job_was_executed(&self, _execution: &ExecutingJob, _error: Option<&JobExecutionError>) {}
}

/// Observes trigger firings.
pub trait TriggerListener: Send + Sync {
    fn name(&self) -> &str;

    fn trigger_fired(&self, _execution: &ExecutingJob) {}

    fn trigger_misfired(&self, _trigger: &Trigger) {}
}

/// Registry of listeners attached to a scheduler.
pub trait ListenerManager: Send + Sync {
    fn add_job_listener(&self, listener: Arc<dyn JobListener>, matcher: GroupMatcher);

    fn remove_job_listener(&self, name: &str) -> bool;

    fn add_trigger_listener(&self, listener: Arc<dyn TriggerListener>, matcher: GroupMatcher);

    fn remove_trigger_listener(&self, name: &str) -> bool;

    fn listener_names(&self) -> Vec<String>;
}
