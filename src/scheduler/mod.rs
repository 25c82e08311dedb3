//! The scheduler API presented to callers.
//!
//! [`Scheduler`] is the local face of a scheduling engine. A
//! [`RemoteSchedulerProxy`](crate::proxy::RemoteSchedulerProxy) implements it
//! by forwarding every call to a remote engine.

mod error;
mod local;

pub use error::{
    CommunicationError, InterruptFailure, InterruptTarget, SchedulerError,
    UnableToInterruptError, UnsupportedOperation,
};
pub use local::{
    Job, JobExecutionError, JobFactory, JobListener, ListenerManager, TriggerListener,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::core::calendar::Calendar;
use crate::core::job::{JobDataMap, JobDetail};
use crate::core::matcher::GroupMatcher;
use crate::core::metadata::{ExecutingJob, SchedulerContext, SchedulerMetaData};
use crate::core::trigger::{Trigger, TriggerState};
use crate::core::types::{JobKey, TriggerKey};

/// Full scheduler API.
#[async_trait]
pub trait Scheduler: Send + Sync {
    // Lifecycle and metadata

    /// Name of the scheduler.
    async fn scheduler_name(&self) -> Result<String, SchedulerError>;

    /// Instance id of the scheduler.
    async fn scheduler_instance_id(&self) -> Result<String, SchedulerError>;

    /// Context shared with every job.
    async fn context(&self) -> Result<SchedulerContext, SchedulerError>;

    /// Start firing triggers.
    async fn start(&self) -> Result<(), SchedulerError>;

    /// Start firing triggers after `delay`.
    async fn start_delayed(&self, delay: Duration) -> Result<(), SchedulerError>;

    /// Whether the scheduler has ever been started.
    async fn is_started(&self) -> Result<bool, SchedulerError>;

    /// Temporarily stop firing triggers.
    async fn standby(&self) -> Result<(), SchedulerError>;

    async fn is_in_standby_mode(&self) -> Result<bool, SchedulerError>;

    /// Stop the scheduler for good, optionally waiting for running jobs.
    async fn shutdown(&self, wait_for_jobs_to_complete: bool) -> Result<(), SchedulerError>;

    async fn is_shutdown(&self) -> Result<bool, SchedulerError>;

    async fn metadata(&self) -> Result<SchedulerMetaData, SchedulerError>;

    async fn currently_executing_jobs(&self) -> Result<Vec<ExecutingJob>, SchedulerError>;

    // Registration

    /// Store a job and schedule a trigger for it. Returns the first fire time.
    async fn schedule_job(
        &self,
        job: JobDetail,
        trigger: Trigger,
    ) -> Result<DateTime<Utc>, SchedulerError>;

    /// Schedule a trigger for an already stored job. Returns the first fire time.
    async fn schedule_trigger(&self, trigger: Trigger) -> Result<DateTime<Utc>, SchedulerError>;

    async fn schedule_jobs(
        &self,
        jobs: Vec<(JobDetail, Vec<Trigger>)>,
        replace: bool,
    ) -> Result<(), SchedulerError>;

    async fn schedule_job_with_triggers(
        &self,
        job: JobDetail,
        triggers: Vec<Trigger>,
        replace: bool,
    ) -> Result<(), SchedulerError>;

    /// Remove a trigger; returns whether it existed.
    async fn unschedule_job(&self, key: &TriggerKey) -> Result<bool, SchedulerError>;

    async fn unschedule_jobs(&self, keys: &[TriggerKey]) -> Result<bool, SchedulerError>;

    /// Replace a stored trigger. Returns the new first fire time, or `None`
    /// if nothing was stored under `key`.
    async fn reschedule_job(
        &self,
        key: &TriggerKey,
        trigger: Trigger,
    ) -> Result<Option<DateTime<Utc>>, SchedulerError>;

    /// Store a job without scheduling it. Non-durable jobs are rejected.
    async fn add_job(&self, job: JobDetail, replace: bool) -> Result<(), SchedulerError>;

    /// Store a job, durable or not, until a trigger is scheduled for it.
    async fn add_non_durable_job(&self, job: JobDetail, replace: bool)
    -> Result<(), SchedulerError>;

    /// Delete a job and its triggers; returns whether it existed.
    async fn delete_job(&self, key: &JobKey) -> Result<bool, SchedulerError>;

    async fn delete_jobs(&self, keys: &[JobKey]) -> Result<bool, SchedulerError>;

    // Execution control

    /// Fire a job now.
    async fn trigger_job(&self, key: &JobKey, data: Option<JobDataMap>)
    -> Result<(), SchedulerError>;

    /// Interrupt all running instances of a job.
    async fn interrupt(&self, key: &JobKey) -> Result<bool, UnableToInterruptError>;

    /// Interrupt a single firing.
    async fn interrupt_instance(&self, fire_instance_id: &str)
    -> Result<bool, UnableToInterruptError>;

    async fn reset_trigger_from_error_state(&self, key: &TriggerKey)
    -> Result<(), SchedulerError>;

    // Pause and resume

    async fn pause_job(&self, key: &JobKey) -> Result<(), SchedulerError>;

    async fn pause_jobs(&self, matcher: &GroupMatcher) -> Result<(), SchedulerError>;

    async fn pause_trigger(&self, key: &TriggerKey) -> Result<(), SchedulerError>;

    async fn pause_triggers(&self, matcher: &GroupMatcher) -> Result<(), SchedulerError>;

    async fn resume_job(&self, key: &JobKey) -> Result<(), SchedulerError>;

    async fn resume_jobs(&self, matcher: &GroupMatcher) -> Result<(), SchedulerError>;

    async fn resume_trigger(&self, key: &TriggerKey) -> Result<(), SchedulerError>;

    async fn resume_triggers(&self, matcher: &GroupMatcher) -> Result<(), SchedulerError>;

    async fn pause_all(&self) -> Result<(), SchedulerError>;

    async fn resume_all(&self) -> Result<(), SchedulerError>;

    async fn paused_trigger_groups(&self) -> Result<HashSet<String>, SchedulerError>;

    // Queries

    async fn job_group_names(&self) -> Result<Vec<String>, SchedulerError>;

    async fn job_keys(&self, matcher: &GroupMatcher) -> Result<HashSet<JobKey>, SchedulerError>;

    async fn triggers_of_job(&self, key: &JobKey) -> Result<Vec<Trigger>, SchedulerError>;

    async fn trigger_group_names(&self) -> Result<Vec<String>, SchedulerError>;

    async fn trigger_keys(
        &self,
        matcher: &GroupMatcher,
    ) -> Result<HashSet<TriggerKey>, SchedulerError>;

    async fn job_detail(&self, key: &JobKey) -> Result<Option<JobDetail>, SchedulerError>;

    async fn trigger(&self, key: &TriggerKey) -> Result<Option<Trigger>, SchedulerError>;

    async fn trigger_state(&self, key: &TriggerKey) -> Result<TriggerState, SchedulerError>;

    async fn check_job_exists(&self, key: &JobKey) -> Result<bool, SchedulerError>;

    async fn check_trigger_exists(&self, key: &TriggerKey) -> Result<bool, SchedulerError>;

    // Calendars

    async fn add_calendar(
        &self,
        name: &str,
        calendar: Calendar,
        replace: bool,
        update_triggers: bool,
    ) -> Result<(), SchedulerError>;

    async fn delete_calendar(&self, name: &str) -> Result<bool, SchedulerError>;

    async fn calendar(&self, name: &str) -> Result<Option<Calendar>, SchedulerError>;

    async fn calendar_names(&self) -> Result<Vec<String>, SchedulerError>;

    // Bulk

    /// Delete all jobs, triggers and calendars.
    async fn clear(&self) -> Result<(), SchedulerError>;

    // In-process only

    /// Replace the factory that instantiates jobs.
    fn set_job_factory(&self, factory: Arc<dyn JobFactory>) -> Result<(), SchedulerError>;

    /// Access the listener registry.
    fn listener_manager(&self) -> Result<Arc<dyn ListenerManager>, SchedulerError>;
}
