//! The remote scheduler endpoint and the factory that connects to it.
//!
//! The transport is not part of this crate. A transport implements
//! [`RemoteScheduler`] for its client stub and [`EndpointFactory`] for however
//! it resolves and dials the engine.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::core::calendar::Calendar;
use crate::core::job::{JobDataMap, JobDetail};
use crate::core::matcher::GroupMatcher;
use crate::core::metadata::{ExecutingJob, SchedulerContext, SchedulerMetaData};
use crate::core::trigger::{Trigger, TriggerState};
use crate::core::types::{JobKey, TriggerKey};

use super::error::{ConnectionFailure, RemoteResult};

/// Operations a remote scheduler engine exposes over the wire.
#[async_trait]
pub trait RemoteScheduler: Send + Sync {
    // Lifecycle and metadata

    async fn scheduler_name(&self) -> RemoteResult<String>;

    async fn scheduler_instance_id(&self) -> RemoteResult<String>;

    async fn context(&self) -> RemoteResult<SchedulerContext>;

    async fn start(&self) -> RemoteResult<()>;

    async fn start_delayed(&self, delay: Duration) -> RemoteResult<()>;

    async fn standby(&self) -> RemoteResult<()>;

    async fn is_in_standby_mode(&self) -> RemoteResult<bool>;

    async fn shutdown(&self, wait_for_jobs_to_complete: bool) -> RemoteResult<()>;

    async fn is_shutdown(&self) -> RemoteResult<bool>;

    /// When the engine was started, `None` if it has not been.
    async fn running_since(&self) -> RemoteResult<Option<DateTime<Utc>>>;

    async fn metadata(&self) -> RemoteResult<SchedulerMetaData>;

    async fn currently_executing_jobs(&self) -> RemoteResult<Vec<ExecutingJob>>;

    // Registration

    /// Store `job` and schedule `trigger` for it; returns the first fire time.
    async fn schedule_job(&self, job: JobDetail, trigger: Trigger)
    -> RemoteResult<DateTime<Utc>>;

    /// Schedule a trigger for an already stored job; returns the first fire time.
    async fn schedule_trigger(&self, trigger: Trigger) -> RemoteResult<DateTime<Utc>>;

    async fn schedule_jobs(
        &self,
        jobs: Vec<(JobDetail, Vec<Trigger>)>,
        replace: bool,
    ) -> RemoteResult<()>;

    async fn schedule_job_with_triggers(
        &self,
        job: JobDetail,
        triggers: Vec<Trigger>,
        replace: bool,
    ) -> RemoteResult<()>;

    async fn unschedule_job(&self, key: &TriggerKey) -> RemoteResult<bool>;

    async fn unschedule_jobs(&self, keys: &[TriggerKey]) -> RemoteResult<bool>;

    /// Replace the trigger stored under `key`; returns the new first fire
    /// time, or `None` if no trigger was stored under `key`.
    async fn reschedule_job(
        &self,
        key: &TriggerKey,
        trigger: Trigger,
    ) -> RemoteResult<Option<DateTime<Utc>>>;

    async fn add_job(
        &self,
        job: JobDetail,
        replace: bool,
        store_non_durable_while_awaiting_scheduling: bool,
    ) -> RemoteResult<()>;

    async fn delete_job(&self, key: &JobKey) -> RemoteResult<bool>;

    async fn delete_jobs(&self, keys: &[JobKey]) -> RemoteResult<bool>;

    // Execution control

    async fn trigger_job(&self, key: &JobKey, data: Option<JobDataMap>) -> RemoteResult<()>;

    async fn interrupt(&self, key: &JobKey) -> RemoteResult<bool>;

    async fn interrupt_instance(&self, fire_instance_id: &str) -> RemoteResult<bool>;

    async fn reset_trigger_from_error_state(&self, key: &TriggerKey) -> RemoteResult<()>;

    // Pause and resume

    async fn pause_job(&self, key: &JobKey) -> RemoteResult<()>;

    async fn pause_jobs(&self, matcher: &GroupMatcher) -> RemoteResult<()>;

    async fn pause_trigger(&self, key: &TriggerKey) -> RemoteResult<()>;

    async fn pause_triggers(&self, matcher: &GroupMatcher) -> RemoteResult<()>;

    async fn resume_job(&self, key: &JobKey) -> RemoteResult<()>;

    async fn resume_jobs(&self, matcher: &GroupMatcher) -> RemoteResult<()>;

    async fn resume_trigger(&self, key: &TriggerKey) -> RemoteResult<()>;

    async fn resume_triggers(&self, matcher: &GroupMatcher) -> RemoteResult<()>;

    async fn pause_all(&self) -> RemoteResult<()>;

    async fn resume_all(&self) -> RemoteResult<()>;

    async fn paused_trigger_groups(&self) -> RemoteResult<HashSet<String>>;

    // Queries

    async fn job_group_names(&self) -> RemoteResult<Vec<String>>;

    async fn job_keys(&self, matcher: &GroupMatcher) -> RemoteResult<HashSet<JobKey>>;

    async fn triggers_of_job(&self, key: &JobKey) -> RemoteResult<Vec<Trigger>>;

    async fn trigger_group_names(&self) -> RemoteResult<Vec<String>>;

    async fn trigger_keys(&self, matcher: &GroupMatcher) -> RemoteResult<HashSet<TriggerKey>>;

    async fn job_detail(&self, key: &JobKey) -> RemoteResult<Option<JobDetail>>;

    async fn trigger(&self, key: &TriggerKey) -> RemoteResult<Option<Trigger>>;

    async fn trigger_state(&self, key: &TriggerKey) -> RemoteResult<TriggerState>;

    async fn check_job_exists(&self, key: &JobKey) -> RemoteResult<bool>;

    async fn check_trigger_exists(&self, key: &TriggerKey) -> RemoteResult<bool>;

    // Calendars

    async fn add_calendar(
        &self,
        name: &str,
        calendar: Calendar,
        replace: bool,
        update_triggers: bool,
    ) -> RemoteResult<()>;

    async fn delete_calendar(&self, name: &str) -> RemoteResult<bool>;

    async fn calendar(&self, name: &str) -> RemoteResult<Option<Calendar>>;

    async fn calendar_names(&self) -> RemoteResult<Vec<String>>;

    // Bulk

    /// Delete all jobs, triggers and calendars.
    async fn clear(&self) -> RemoteResult<()>;
}

/// Produces references to a remote scheduler.
///
/// Implementations must tolerate being called concurrently and repeatedly:
/// two callers racing on an empty cache may both connect.
#[async_trait]
pub trait EndpointFactory: Send + Sync {
    /// Resolve and connect to the endpoint.
    async fn connect(&self) -> Result<Arc<dyn RemoteScheduler>, ConnectionFailure>;

    /// Human readable description of the endpoint, used in error messages.
    fn describe(&self) -> String;
}

/// Adapts a synchronous closure into an [`EndpointFactory`].
pub struct FnFactory<F> {
    description: String,
    connect: F,
}

impl<F> FnFactory<F>
where
    F: Fn() -> Result<Arc<dyn RemoteScheduler>, ConnectionFailure> + Send + Sync,
{
    /// Create a factory from a closure.
    pub fn new(description: impl Into<String>, connect: F) -> Self {
        Self {
            description: description.into(),
            connect,
        }
    }
}

impl<F> fmt::Debug for FnFactory<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFactory")
            .field("description", &self.description)
            .finish()
    }
}

#[async_trait]
impl<F> EndpointFactory for FnFactory<F>
where
    F: Fn() -> Result<Arc<dyn RemoteScheduler>, ConnectionFailure> + Send + Sync,
{
    async fn connect(&self) -> Result<Arc<dyn RemoteScheduler>, ConnectionFailure> {
        (self.connect)()
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}
