//! One forwarding method per scheduler operation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use super::RemoteSchedulerProxy;
use crate::core::calendar::Calendar;
use crate::core::job::{JobDataMap, JobDetail};
use crate::core::matcher::GroupMatcher;
use crate::core::metadata::{ExecutingJob, SchedulerContext, SchedulerMetaData};
use crate::core::trigger::{Trigger, TriggerState};
use crate::core::types::{JobKey, TriggerKey};
use crate::scheduler::{
    InterruptTarget, JobFactory, ListenerManager, Scheduler, SchedulerError,
    UnableToInterruptError, UnsupportedOperation,
};

#[async_trait]
impl Scheduler for RemoteSchedulerProxy {
    async fn scheduler_name(&self) -> Result<String, SchedulerError> {
        self.forward("scheduler_name", |remote| async move {
            remote.scheduler_name().await
        })
        .await
    }

    async fn scheduler_instance_id(&self) -> Result<String, SchedulerError> {
        self.forward("scheduler_instance_id", |remote| async move {
            remote.scheduler_instance_id().await
        })
        .await
    }

    async fn context(&self) -> Result<SchedulerContext, SchedulerError> {
        self.forward("context", |remote| async move { remote.context().await })
            .await
    }

    async fn start(&self) -> Result<(), SchedulerError> {
        self.forward("start", |remote| async move { remote.start().await })
            .await
    }

    async fn start_delayed(&self, delay: Duration) -> Result<(), SchedulerError> {
        self.forward("start_delayed", move |remote| async move {
            remote.start_delayed(delay).await
        })
        .await
    }

    async fn is_started(&self) -> Result<bool, SchedulerError> {
        // The proxy keeps no history of its own; ask the engine.
        let running_since = self
            .forward("running_since", |remote| async move {
                remote.running_since().await
            })
            .await?;
        Ok(running_since.is_some())
    }

    async fn standby(&self) -> Result<(), SchedulerError> {
        self.forward("standby", |remote| async move { remote.standby().await })
            .await
    }

    async fn is_in_standby_mode(&self) -> Result<bool, SchedulerError> {
        self.forward("is_in_standby_mode", |remote| async move {
            remote.is_in_standby_mode().await
        })
        .await
    }

    async fn shutdown(&self, wait_for_jobs_to_complete: bool) -> Result<(), SchedulerError> {
        let result = self
            .forward("shutdown", move |remote| async move {
                remote.shutdown(wait_for_jobs_to_complete).await
            })
            .await;

        // A failed shutdown may leave the engine alive, so it stays reachable by name.
        match &result {
            Ok(()) => self.deregister(),
            Err(e) => {
                tracing::warn!(scheduler = %self.scheduler_id, error = %e, "Remote shutdown failed, keeping directory entry");
            }
        }
        result
    }

    async fn is_shutdown(&self) -> Result<bool, SchedulerError> {
        self.forward("is_shutdown", |remote| async move {
            remote.is_shutdown().await
        })
        .await
    }

    async fn metadata(&self) -> Result<SchedulerMetaData, SchedulerError> {
        self.forward("metadata", |remote| async move { remote.metadata().await })
            .await
    }

    async fn currently_executing_jobs(&self) -> Result<Vec<ExecutingJob>, SchedulerError> {
        self.forward("currently_executing_jobs", |remote| async move {
            remote.currently_executing_jobs().await
        })
        .await
    }

    async fn schedule_job(
        &self,
        job: JobDetail,
        trigger: Trigger,
    ) -> Result<DateTime<Utc>, SchedulerError> {
        self.forward("schedule_job", move |remote| async move {
            remote.schedule_job(job, trigger).await
        })
        .await
    }

    async fn schedule_trigger(&self, trigger: Trigger) -> Result<DateTime<Utc>, SchedulerError> {
        self.forward("schedule_trigger", move |remote| async move {
            remote.schedule_trigger(trigger).await
        })
        .await
    }

    async fn schedule_jobs(
        &self,
        jobs: Vec<(JobDetail, Vec<Trigger>)>,
        replace: bool,
    ) -> Result<(), SchedulerError> {
        self.forward("schedule_jobs", move |remote| async move {
            remote.schedule_jobs(jobs, replace).await
        })
        .await
    }

    async fn schedule_job_with_triggers(
        &self,
        job: JobDetail,
        triggers: Vec<Trigger>,
        replace: bool,
    ) -> Result<(), SchedulerError> {
        self.forward("schedule_job_with_triggers", move |remote| async move {
            remote.schedule_job_with_triggers(job, triggers, replace).await
        })
        .await
    }

    async fn unschedule_job(&self, key: &TriggerKey) -> Result<bool, SchedulerError> {
        self.forward("unschedule_job", move |remote| async move {
            remote.unschedule_job(key).await
        })
        .await
    }

    async fn unschedule_jobs(&self, keys: &[TriggerKey]) -> Result<bool, SchedulerError> {
        self.forward("unschedule_jobs", move |remote| async move {
            remote.unschedule_jobs(keys).await
        })
        .await
    }

    async fn reschedule_job(
        &self,
        key: &TriggerKey,
        trigger: Trigger,
    ) -> Result<Option<DateTime<Utc>>, SchedulerError> {
        self.forward("reschedule_job", move |remote| async move {
            remote.reschedule_job(key, trigger).await
        })
        .await
    }

    async fn add_job(&self, job: JobDetail, replace: bool) -> Result<(), SchedulerError> {
        self.forward("add_job", move |remote| async move {
            remote.add_job(job, replace, false).await
        })
        .await
    }

    async fn add_non_durable_job(
        &self,
        job: JobDetail,
        replace: bool,
    ) -> Result<(), SchedulerError> {
        self.forward("add_job", move |remote| async move {
            remote.add_job(job, replace, true).await
        })
        .await
    }

    async fn delete_job(&self, key: &JobKey) -> Result<bool, SchedulerError> {
        self.forward("delete_job", move |remote| async move {
            remote.delete_job(key).await
        })
        .await
    }

    async fn delete_jobs(&self, keys: &[JobKey]) -> Result<bool, SchedulerError> {
        self.forward("delete_jobs", move |remote| async move {
            remote.delete_jobs(keys).await
        })
        .await
    }

    async fn trigger_job(
        &self,
        key: &JobKey,
        data: Option<JobDataMap>,
    ) -> Result<(), SchedulerError> {
        self.forward("trigger_job", move |remote| async move {
            remote.trigger_job(key, data).await
        })
        .await
    }

    async fn interrupt(&self, key: &JobKey) -> Result<bool, UnableToInterruptError> {
        let target = InterruptTarget::Job(key.clone());
        self.forward_interrupt(target, "interrupt", move |remote| async move {
            remote.interrupt(key).await
        })
        .await
    }

    async fn interrupt_instance(
        &self,
        fire_instance_id: &str,
    ) -> Result<bool, UnableToInterruptError> {
        let target = InterruptTarget::Instance(fire_instance_id.to_string());
        self.forward_interrupt(target, "interrupt_instance", move |remote| async move {
            remote.interrupt_instance(fire_instance_id).await
        })
        .await
    }

    async fn reset_trigger_from_error_state(
        &self,
        key: &TriggerKey,
    ) -> Result<(), SchedulerError> {
        self.forward("reset_trigger_from_error_state", move |remote| async move {
            remote.reset_trigger_from_error_state(key).await
        })
        .await
    }

    async fn pause_job(&self, key: &JobKey) -> Result<(), SchedulerError> {
        self.forward("pause_job", move |remote| async move {
            remote.pause_job(key).await
        })
        .await
    }

    async fn pause_jobs(&self, matcher: &GroupMatcher) -> Result<(), SchedulerError> {
        self.forward("pause_jobs", move |remote| async move {
            remote.pause_jobs(matcher).await
        })
        .await
    }

    async fn pause_trigger(&self, key: &TriggerKey) -> Result<(), SchedulerError> {
        self.forward("pause_trigger", move |remote| async move {
            remote.pause_trigger(key).await
        })
        .await
    }

    async fn pause_triggers(&self, matcher: &GroupMatcher) -> Result<(), SchedulerError> {
        self.forward("pause_triggers", move |remote| async move {
            remote.pause_triggers(matcher).await
        })
        .await
    }

    async fn resume_job(&self, key: &JobKey) -> Result<(), SchedulerError> {
        self.forward("resume_job", move |remote| async move {
            remote.resume_job(key).await
        })
        .await
    }

    async fn resume_jobs(&self, matcher: &GroupMatcher) -> Result<(), SchedulerError> {
        self.forward("resume_jobs", move |remote| async move {
            remote.resume_jobs(matcher).await
        })
        .await
    }

    async fn resume_trigger(&self, key: &TriggerKey) -> Result<(), SchedulerError> {
        self.forward("resume_trigger", move |remote| async move {
            remote.resume_trigger(key).await
        })
        .await
    }

    async fn resume_triggers(&self, matcher: &GroupMatcher) -> Result<(), SchedulerError> {
        self.forward("resume_triggers", move |remote| async move {
            remote.resume_triggers(matcher).await
        })
        .await
    }

    async fn pause_all(&self) -> Result<(), SchedulerError> {
        self.forward("pause_all", |remote| async move { remote.pause_all().await })
            .await
    }

    async fn resume_all(&self) -> Result<(), SchedulerError> {
        self.forward("resume_all", |remote| async move { remote.resume_all().await })
            .await
    }

    async fn paused_trigger_groups(&self) -> Result<HashSet<String>, SchedulerError> {
        self.forward("paused_trigger_groups", |remote| async move {
            remote.paused_trigger_groups().await
        })
        .await
    }

    async fn job_group_names(&self) -> Result<Vec<String>, SchedulerError> {
        self.forward("job_group_names", |remote| async move {
            remote.job_group_names().await
        })
        .await
    }

    async fn job_keys(&self, matcher: &GroupMatcher) -> Result<HashSet<JobKey>, SchedulerError> {
        self.forward("job_keys", move |remote| async move {
            remote.job_keys(matcher).await
        })
        .await
    }

    async fn triggers_of_job(&self, key: &JobKey) -> Result<Vec<Trigger>, SchedulerError> {
        self.forward("triggers_of_job", move |remote| async move {
            remote.triggers_of_job(key).await
        })
        .await
    }

    async fn trigger_group_names(&self) -> Result<Vec<String>, SchedulerError> {
        self.forward("trigger_group_names", |remote| async move {
            remote.trigger_group_names().await
        })
        .await
    }

    async fn trigger_keys(
        &self,
        matcher: &GroupMatcher,
    ) -> Result<HashSet<TriggerKey>, SchedulerError> {
        self.forward("trigger_keys", move |remote| async move {
            remote.trigger_keys(matcher).await
        })
        .await
    }

    async fn job_detail(&self, key: &JobKey) -> Result<Option<JobDetail>, SchedulerError> {
        self.forward("job_detail", move |remote| async move {
            remote.job_detail(key).await
        })
        .await
    }

    async fn trigger(&self, key: &TriggerKey) -> Result<Option<Trigger>, SchedulerError> {
        self.forward("trigger", move |remote| async move { remote.trigger(key).await })
            .await
    }

    async fn trigger_state(&self, key: &TriggerKey) -> Result<TriggerState, SchedulerError> {
        self.forward("trigger_state", move |remote| async move {
            remote.trigger_state(key).await
        })
        .await
    }

    async fn check_job_exists(&self, key: &JobKey) -> Result<bool, SchedulerError> {
        self.forward("check_job_exists", move |remote| async move {
            remote.check_job_exists(key).await
        })
        .await
    }

    async fn check_trigger_exists(&self, key: &TriggerKey) -> Result<bool, SchedulerError> {
        self.forward("check_trigger_exists", move |remote| async move {
            remote.check_trigger_exists(key).await
        })
        .await
    }

    async fn add_calendar(
        &self,
        name: &str,
        calendar: Calendar,
        replace: bool,
        update_triggers: bool,
    ) -> Result<(), SchedulerError> {
        self.forward("add_calendar", move |remote| async move {
            remote
                .add_calendar(name, calendar, replace, update_triggers)
                .await
        })
        .await
    }

    async fn delete_calendar(&self, name: &str) -> Result<bool, SchedulerError> {
        self.forward("delete_calendar", move |remote| async move {
            remote.delete_calendar(name).await
        })
        .await
    }

    async fn calendar(&self, name: &str) -> Result<Option<Calendar>, SchedulerError> {
        self.forward("calendar", move |remote| async move {
            remote.calendar(name).await
        })
        .await
    }

    async fn calendar_names(&self) -> Result<Vec<String>, SchedulerError> {
        self.forward("calendar_names", |remote| async move {
            remote.calendar_names().await
        })
        .await
    }

    async fn clear(&self) -> Result<(), SchedulerError> {
        self.forward("clear", |remote| async move { remote.clear().await })
            .await
    }

    fn set_job_factory(&self, _factory: Arc<dyn JobFactory>) -> Result<(), SchedulerError> {
        Err(UnsupportedOperation::new(
            "set_job_factory",
            "jobs are instantiated inside the remote engine's process",
        )
        .into())
    }

    fn listener_manager(&self) -> Result<Arc<dyn ListenerManager>, SchedulerError> {
        Err(UnsupportedOperation::new(
            "listener_manager",
            "listeners run inside the remote engine's process",
        )
        .into())
    }
}
