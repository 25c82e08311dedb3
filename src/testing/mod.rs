//! Testing utilities for code that talks to a remote scheduler.
//!
//! This module provides in-process stand-ins for the pieces a transport
//! would normally supply:
//!
//! - [`FakeEngine`]: an in-memory [`RemoteScheduler`] with failure injection
//! - [`CountingFactory`]: an [`EndpointFactory`] that counts connections and
//!   can be told to fail
//! - [`RecordingDirectory`]: a [`SchedulerDirectory`] that counts removals

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::core::calendar::Calendar;
use crate::core::job::{JobDataMap, JobDetail};
use crate::core::matcher::GroupMatcher;
use crate::core::metadata::{ExecutingJob, SchedulerContext, SchedulerMetaData};
use crate::core::trigger::{Trigger, TriggerState};
use crate::core::types::{JobKey, TriggerKey};
use crate::core::wrapper::{InternalTriggerState, TriggerWrapper};
use crate::directory::{DirectoryError, InMemoryDirectory, SchedulerDirectory};
use crate::remote::{
    ConnectionFailure, DomainError, EndpointFactory, RemoteError, RemoteResult, RemoteScheduler,
};
use crate::scheduler::Scheduler;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct Faults {
    /// Consumed one per call, whatever the operation.
    next: VecDeque<RemoteError>,
    /// Returned on every call to the named operation until cleared.
    operations: HashMap<&'static str, RemoteError>,
}

struct EngineState {
    jobs: HashMap<JobKey, JobDetail>,
    triggers: HashSet<TriggerWrapper>,
    calendars: BTreeMap<String, Calendar>,
    paused_trigger_groups: HashSet<String>,
    paused_job_groups: HashSet<String>,
    context: SchedulerContext,
    running_since: Option<DateTime<Utc>>,
    standby: bool,
    shutdown: bool,
    executing: Vec<ExecutingJob>,
    triggered: Vec<(JobKey, Option<JobDataMap>)>,
    jobs_executed: u64,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            jobs: HashMap::new(),
            triggers: HashSet::new(),
            calendars: BTreeMap::new(),
            paused_trigger_groups: HashSet::new(),
            paused_job_groups: HashSet::new(),
            context: SchedulerContext::new(),
            running_since: None,
            // An engine that was never started is in standby.
            standby: true,
            shutdown: false,
            executing: Vec::new(),
            triggered: Vec::new(),
            jobs_executed: 0,
        }
    }
}

impl EngineState {
    fn ensure_not_shutdown(&self) -> Result<(), DomainError> {
        if self.shutdown {
            return Err(DomainError::SchedulerShutdown);
        }
        Ok(())
    }

    fn store_job(&mut self, job: JobDetail, replace: bool) -> Result<(), DomainError> {
        if !replace && self.jobs.contains_key(job.key()) {
            return Err(DomainError::ObjectAlreadyExists(job.key().to_string()));
        }
        self.jobs.insert(job.key().clone(), job);
        Ok(())
    }

    fn store_trigger(
        &mut self,
        trigger: Trigger,
        replace: bool,
    ) -> Result<DateTime<Utc>, DomainError> {
        if !self.jobs.contains_key(trigger.job_key()) {
            return Err(DomainError::JobNotFound(trigger.job_key().clone()));
        }
        if let Some(calendar) = trigger.calendar_name()
            && !self.calendars.contains_key(calendar)
        {
            return Err(DomainError::CalendarNotFound(calendar.to_string()));
        }
        if !replace && self.triggers.contains(trigger.key()) {
            return Err(DomainError::ObjectAlreadyExists(trigger.key().to_string()));
        }

        let first_fire = trigger
            .schedule()
            .first_fire_time(trigger.start_time())
            .map_err(|e| DomainError::InvalidArgument(e.to_string()))?;
        if let Some(end) = trigger.end_time()
            && first_fire > end
        {
            return Err(DomainError::InvalidArgument(format!(
                "trigger '{}' will never fire",
                trigger.key()
            )));
        }

        let paused = self.paused_trigger_groups.contains(trigger.key().group())
            || self.paused_job_groups.contains(trigger.job_key().group());
        let mut wrapper = TriggerWrapper::new(trigger);
        if paused {
            wrapper.set_state(InternalTriggerState::Paused);
        }
        self.triggers.replace(wrapper);
        Ok(first_fire)
    }

    /// Remove a trigger, and its job too if the job is not durable and has
    /// no triggers left.
    fn remove_trigger(&mut self, key: &TriggerKey) -> bool {
        let Some(wrapper) = self.triggers.take(key) else {
            return false;
        };
        let job_key = wrapper.job_key();
        let orphaned = !self.triggers.iter().any(|w| w.job_key() == job_key);
        if orphaned
            && let Some(job) = self.jobs.get(job_key)
            && !job.is_durable()
        {
            self.jobs.remove(job_key);
        }
        true
    }

    fn remove_job(&mut self, key: &JobKey) -> bool {
        self.triggers.retain(|w| w.job_key() != key);
        self.jobs.remove(key).is_some()
    }

    fn trigger_keys_where(&self, predicate: impl Fn(&TriggerWrapper) -> bool) -> Vec<TriggerKey> {
        self.triggers
            .iter()
            .filter(|w| predicate(w))
            .map(|w| w.key().clone())
            .collect()
    }

    fn update_state(
        &mut self,
        key: &TriggerKey,
        update: impl FnOnce(InternalTriggerState) -> InternalTriggerState,
    ) {
        if let Some(mut wrapper) = self.triggers.take(key) {
            wrapper.set_state(update(wrapper.state()));
            self.triggers.insert(wrapper);
        }
    }

    fn pause(&mut self, key: &TriggerKey) {
        self.update_state(key, |state| match state {
            InternalTriggerState::Complete => state,
            InternalTriggerState::Blocked | InternalTriggerState::PausedAndBlocked => {
                InternalTriggerState::PausedAndBlocked
            }
            _ => InternalTriggerState::Paused,
        });
    }

    fn resume(&mut self, key: &TriggerKey) {
        self.update_state(key, |state| match state {
            InternalTriggerState::Paused => InternalTriggerState::Waiting,
            InternalTriggerState::PausedAndBlocked => InternalTriggerState::Blocked,
            _ => state,
        });
    }

    fn pause_triggers(&mut self, matcher: &GroupMatcher) {
        for key in self.trigger_keys_where(|w| matcher.matches_trigger(w.key())) {
            self.pause(&key);
            self.paused_trigger_groups.insert(key.group().to_string());
        }
        // Naming a group pauses it even before it has any triggers.
        if let GroupMatcher::Equals(group) = matcher {
            self.paused_trigger_groups.insert(group.clone());
        }
    }

    fn resume_triggers(&mut self, matcher: &GroupMatcher) {
        for key in self.trigger_keys_where(|w| matcher.matches_trigger(w.key())) {
            self.resume(&key);
        }
        self.paused_trigger_groups
            .retain(|group| !matcher.matches_group(group));
    }

    fn pause_jobs(&mut self, matcher: &GroupMatcher) {
        for key in self.trigger_keys_where(|w| matcher.matches_job(w.job_key())) {
            self.pause(&key);
        }
        let groups: Vec<String> = self
            .jobs
            .keys()
            .filter(|k| matcher.matches_job(k))
            .map(|k| k.group().to_string())
            .collect();
        self.paused_job_groups.extend(groups);
        if let GroupMatcher::Equals(group) = matcher {
            self.paused_job_groups.insert(group.clone());
        }
    }

    fn resume_jobs(&mut self, matcher: &GroupMatcher) {
        for key in self.trigger_keys_where(|w| matcher.matches_job(w.job_key())) {
            self.resume(&key);
        }
        self.paused_job_groups
            .retain(|group| !matcher.matches_group(group));
    }
}

/// In-memory scheduler engine for tests.
///
/// Behaves like a small job store: jobs, triggers and calendars are kept in
/// maps, and triggers carry their lifecycle state in [`TriggerWrapper`]s.
/// Failures can be injected per call or per operation.
///
/// # Example
///
/// ```
/// use petit_remote::remote::{RemoteScheduler, TransportError};
/// use petit_remote::testing::FakeEngine;
///
/// # tokio_test_block_on(async {
/// let engine = FakeEngine::new("reporting");
/// engine.fail_next(TransportError::Disconnected("reset".into()));
///
/// assert!(engine.start().await.is_err());
/// assert!(engine.start().await.is_ok());
/// assert_eq!(engine.call_count(), 2);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub struct FakeEngine {
    name: String,
    instance_id: String,
    state: Mutex<EngineState>,
    faults: Mutex<Faults>,
    call_count: AtomicUsize,
    call_log: Mutex<Vec<&'static str>>,
    log_calls: AtomicBool,
}

impl FakeEngine {
    /// Create an engine with the given scheduler name.
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            instance_id: uuid::Uuid::new_v4().to_string(),
            state: Mutex::new(EngineState::default()),
            faults: Mutex::new(Faults::default()),
            call_count: AtomicUsize::new(0),
            call_log: Mutex::new(Vec::new()),
            log_calls: AtomicBool::new(true),
        })
    }

    /// Fail the next call, whatever operation it is.
    ///
    /// Queued failures are consumed in order, one per call.
    pub fn fail_next(&self, err: impl Into<RemoteError>) {
        lock(&self.faults).next.push_back(err.into());
    }

    /// Fail every call to `operation` until [`clear_faults`](Self::clear_faults).
    pub fn fail_operation(&self, operation: &'static str, err: impl Into<RemoteError>) {
        lock(&self.faults).operations.insert(operation, err.into());
    }

    /// Drop all injected failures.
    pub fn clear_faults(&self) {
        let mut faults = lock(&self.faults);
        faults.next.clear();
        faults.operations.clear();
    }

    /// Number of calls received, failed ones included.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Operations received, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        lock(&self.call_log).clone()
    }

    /// Empty the call log. [`call_count`](Self::call_count) keeps counting.
    pub fn clear_calls(&self) {
        lock(&self.call_log).clear();
    }

    /// Turn the call log on or off. It is on by default; long-running loops
    /// such as benchmarks should turn it off.
    pub fn set_call_logging(&self, enabled: bool) {
        self.log_calls.store(enabled, Ordering::SeqCst);
    }

    /// Mark a job as currently running.
    pub fn add_executing(&self, job: ExecutingJob) {
        lock(&self.state).executing.push(job);
    }

    /// Force a trigger into a state, as the engine's firing loop would.
    pub fn set_trigger_state(&self, key: &TriggerKey, state: InternalTriggerState) {
        lock(&self.state).update_state(key, |_| state);
    }

    /// Internal state of a stored trigger.
    pub fn trigger_wrapper_state(&self, key: &TriggerKey) -> Option<InternalTriggerState> {
        lock(&self.state).triggers.get(key).map(|w| w.state())
    }

    /// Jobs fired through `trigger_job`, in order.
    pub fn triggered_jobs(&self) -> Vec<(JobKey, Option<JobDataMap>)> {
        lock(&self.state).triggered.clone()
    }

    /// Record the call and return any injected failure for it.
    fn check(&self, operation: &'static str) -> RemoteResult<()> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.log_calls.load(Ordering::SeqCst) {
            lock(&self.call_log).push(operation);
        }
        let mut faults = lock(&self.faults);
        if let Some(err) = faults.operations.get(operation) {
            return Err(err.clone());
        }
        match faults.next.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn state(&self) -> MutexGuard<'_, EngineState> {
        lock(&self.state)
    }
}

impl std::fmt::Debug for FakeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeEngine")
            .field("name", &self.name)
            .field("instance_id", &self.instance_id)
            .finish()
    }
}

fn sorted(groups: impl Iterator<Item = String>) -> Vec<String> {
    groups.collect::<BTreeSet<_>>().into_iter().collect()
}

#[async_trait]
impl RemoteScheduler for FakeEngine {
    async fn scheduler_name(&self) -> RemoteResult<String> {
        self.check("scheduler_name")?;
        Ok(self.name.clone())
    }

    async fn scheduler_instance_id(&self) -> RemoteResult<String> {
        self.check("scheduler_instance_id")?;
        Ok(self.instance_id.clone())
    }

    async fn context(&self) -> RemoteResult<SchedulerContext> {
        self.check("context")?;
        Ok(self.state().context.clone())
    }

    async fn start(&self) -> RemoteResult<()> {
        self.check("start")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        state.running_since.get_or_insert_with(Utc::now);
        state.standby = false;
        Ok(())
    }

    async fn start_delayed(&self, _delay: Duration) -> RemoteResult<()> {
        self.check("start_delayed")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        state.running_since.get_or_insert_with(Utc::now);
        state.standby = false;
        Ok(())
    }

    async fn standby(&self) -> RemoteResult<()> {
        self.check("standby")?;
        self.state().standby = true;
        Ok(())
    }

    async fn is_in_standby_mode(&self) -> RemoteResult<bool> {
        self.check("is_in_standby_mode")?;
        Ok(self.state().standby)
    }

    async fn shutdown(&self, _wait_for_jobs_to_complete: bool) -> RemoteResult<()> {
        self.check("shutdown")?;
        let mut state = self.state();
        state.shutdown = true;
        state.standby = true;
        state.executing.clear();
        Ok(())
    }

    async fn is_shutdown(&self) -> RemoteResult<bool> {
        self.check("is_shutdown")?;
        Ok(self.state().shutdown)
    }

    async fn running_since(&self) -> RemoteResult<Option<DateTime<Utc>>> {
        self.check("running_since")?;
        Ok(self.state().running_since)
    }

    async fn metadata(&self) -> RemoteResult<SchedulerMetaData> {
        self.check("metadata")?;
        let state = self.state();
        Ok(SchedulerMetaData {
            scheduler_name: self.name.clone(),
            instance_id: self.instance_id.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            running_since: state.running_since,
            in_standby_mode: state.standby,
            shutdown: state.shutdown,
            jobs_executed: state.jobs_executed,
            thread_pool_size: 1,
            persistent_store: false,
            clustered: false,
        })
    }

    async fn currently_executing_jobs(&self) -> RemoteResult<Vec<ExecutingJob>> {
        self.check("currently_executing_jobs")?;
        Ok(self.state().executing.clone())
    }

    async fn schedule_job(
        &self,
        job: JobDetail,
        trigger: Trigger,
    ) -> RemoteResult<DateTime<Utc>> {
        self.check("schedule_job")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        if trigger.job_key() != job.key() {
            return Err(DomainError::InvalidArgument(format!(
                "trigger '{}' does not reference job '{}'",
                trigger.key(),
                job.key()
            ))
            .into());
        }
        if state.triggers.contains(trigger.key()) {
            return Err(DomainError::ObjectAlreadyExists(trigger.key().to_string()).into());
        }
        state.store_job(job, false)?;
        let key = trigger.job_key().clone();
        match state.store_trigger(trigger, false) {
            Ok(first_fire) => Ok(first_fire),
            Err(e) => {
                // Nothing is stored if the trigger is rejected.
                state.jobs.remove(&key);
                Err(e.into())
            }
        }
    }

    async fn schedule_trigger(&self, trigger: Trigger) -> RemoteResult<DateTime<Utc>> {
        self.check("schedule_trigger")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        Ok(state.store_trigger(trigger, false)?)
    }

    async fn schedule_jobs(
        &self,
        jobs: Vec<(JobDetail, Vec<Trigger>)>,
        replace: bool,
    ) -> RemoteResult<()> {
        self.check("schedule_jobs")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        if !replace {
            for (job, triggers) in &jobs {
                if state.jobs.contains_key(job.key()) {
                    return Err(DomainError::ObjectAlreadyExists(job.key().to_string()).into());
                }
                if let Some(t) = triggers.iter().find(|t| state.triggers.contains(t.key())) {
                    return Err(DomainError::ObjectAlreadyExists(t.key().to_string()).into());
                }
            }
        }
        for (job, triggers) in jobs {
            let key = job.key().clone();
            state.store_job(job, true)?;
            for trigger in triggers {
                state.store_trigger(trigger.for_job(key.clone()), true)?;
            }
        }
        Ok(())
    }

    async fn schedule_job_with_triggers(
        &self,
        job: JobDetail,
        triggers: Vec<Trigger>,
        replace: bool,
    ) -> RemoteResult<()> {
        self.check("schedule_job_with_triggers")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        if !replace {
            if state.jobs.contains_key(job.key()) {
                return Err(DomainError::ObjectAlreadyExists(job.key().to_string()).into());
            }
            if let Some(t) = triggers.iter().find(|t| state.triggers.contains(t.key())) {
                return Err(DomainError::ObjectAlreadyExists(t.key().to_string()).into());
            }
        }
        let key = job.key().clone();
        state.store_job(job, true)?;
        for trigger in triggers {
            state.store_trigger(trigger.for_job(key.clone()), true)?;
        }
        Ok(())
    }

    async fn unschedule_job(&self, key: &TriggerKey) -> RemoteResult<bool> {
        self.check("unschedule_job")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        Ok(state.remove_trigger(key))
    }

    async fn unschedule_jobs(&self, keys: &[TriggerKey]) -> RemoteResult<bool> {
        self.check("unschedule_jobs")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        let mut all_found = true;
        for key in keys {
            all_found &= state.remove_trigger(key);
        }
        Ok(all_found)
    }

    async fn reschedule_job(
        &self,
        key: &TriggerKey,
        trigger: Trigger,
    ) -> RemoteResult<Option<DateTime<Utc>>> {
        self.check("reschedule_job")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        let Some(old) = state.triggers.take(key) else {
            return Ok(None);
        };
        let job_key = old.job_key().clone();
        match state.store_trigger(trigger.for_job(job_key), true) {
            Ok(first_fire) => Ok(Some(first_fire)),
            Err(e) => {
                state.triggers.insert(old);
                Err(e.into())
            }
        }
    }

    async fn add_job(
        &self,
        job: JobDetail,
        replace: bool,
        store_non_durable_while_awaiting_scheduling: bool,
    ) -> RemoteResult<()> {
        self.check("add_job")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        if !job.is_durable() && !store_non_durable_while_awaiting_scheduling {
            return Err(DomainError::InvalidArgument(format!(
                "job '{}' has no triggers and is not durable",
                job.key()
            ))
            .into());
        }
        Ok(state.store_job(job, replace)?)
    }

    async fn delete_job(&self, key: &JobKey) -> RemoteResult<bool> {
        self.check("delete_job")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        Ok(state.remove_job(key))
    }

    async fn delete_jobs(&self, keys: &[JobKey]) -> RemoteResult<bool> {
        self.check("delete_jobs")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        let mut all_found = true;
        for key in keys {
            all_found &= state.remove_job(key);
        }
        Ok(all_found)
    }

    async fn trigger_job(&self, key: &JobKey, data: Option<JobDataMap>) -> RemoteResult<()> {
        self.check("trigger_job")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        if !state.jobs.contains_key(key) {
            return Err(DomainError::JobNotFound(key.clone()).into());
        }
        state.triggered.push((key.clone(), data));
        state.jobs_executed += 1;
        Ok(())
    }

    async fn interrupt(&self, key: &JobKey) -> RemoteResult<bool> {
        self.check("interrupt")?;
        let mut state = self.state();
        let before = state.executing.len();
        state.executing.retain(|job| &job.job_key != key);
        Ok(state.executing.len() != before)
    }

    async fn interrupt_instance(&self, fire_instance_id: &str) -> RemoteResult<bool> {
        self.check("interrupt_instance")?;
        let mut state = self.state();
        let before = state.executing.len();
        state
            .executing
            .retain(|job| job.fire_instance_id != fire_instance_id);
        Ok(state.executing.len() != before)
    }

    async fn reset_trigger_from_error_state(&self, key: &TriggerKey) -> RemoteResult<()> {
        self.check("reset_trigger_from_error_state")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        let Some(wrapper) = state.triggers.get(key) else {
            return Ok(());
        };
        if wrapper.state() != InternalTriggerState::Error {
            return Ok(());
        }
        let paused = state.paused_trigger_groups.contains(key.group());
        state.update_state(key, |_| {
            if paused {
                InternalTriggerState::Paused
            } else {
                InternalTriggerState::Waiting
            }
        });
        Ok(())
    }

    async fn pause_job(&self, key: &JobKey) -> RemoteResult<()> {
        self.check("pause_job")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        for trigger in state.trigger_keys_where(|w| w.job_key() == key) {
            state.pause(&trigger);
        }
        Ok(())
    }

    async fn pause_jobs(&self, matcher: &GroupMatcher) -> RemoteResult<()> {
        self.check("pause_jobs")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        state.pause_jobs(matcher);
        Ok(())
    }

    async fn pause_trigger(&self, key: &TriggerKey) -> RemoteResult<()> {
        self.check("pause_trigger")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        state.pause(key);
        Ok(())
    }

    async fn pause_triggers(&self, matcher: &GroupMatcher) -> RemoteResult<()> {
        self.check("pause_triggers")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        state.pause_triggers(matcher);
        Ok(())
    }

    async fn resume_job(&self, key: &JobKey) -> RemoteResult<()> {
        self.check("resume_job")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        for trigger in state.trigger_keys_where(|w| w.job_key() == key) {
            state.resume(&trigger);
        }
        Ok(())
    }

    async fn resume_jobs(&self, matcher: &GroupMatcher) -> RemoteResult<()> {
        self.check("resume_jobs")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        state.resume_jobs(matcher);
        Ok(())
    }

    async fn resume_trigger(&self, key: &TriggerKey) -> RemoteResult<()> {
        self.check("resume_trigger")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        state.resume(key);
        Ok(())
    }

    async fn resume_triggers(&self, matcher: &GroupMatcher) -> RemoteResult<()> {
        self.check("resume_triggers")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        state.resume_triggers(matcher);
        Ok(())
    }

    async fn pause_all(&self) -> RemoteResult<()> {
        self.check("pause_all")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        state.pause_triggers(&GroupMatcher::AnyGroup);
        Ok(())
    }

    async fn resume_all(&self) -> RemoteResult<()> {
        self.check("resume_all")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        state.resume_triggers(&GroupMatcher::AnyGroup);
        state.paused_job_groups.clear();
        Ok(())
    }

    async fn paused_trigger_groups(&self) -> RemoteResult<HashSet<String>> {
        self.check("paused_trigger_groups")?;
        Ok(self.state().paused_trigger_groups.clone())
    }

    async fn job_group_names(&self) -> RemoteResult<Vec<String>> {
        self.check("job_group_names")?;
        let state = self.state();
        Ok(sorted(state.jobs.keys().map(|k| k.group().to_string())))
    }

    async fn job_keys(&self, matcher: &GroupMatcher) -> RemoteResult<HashSet<JobKey>> {
        self.check("job_keys")?;
        let state = self.state();
        Ok(state
            .jobs
            .keys()
            .filter(|k| matcher.matches_job(k))
            .cloned()
            .collect())
    }

    async fn triggers_of_job(&self, key: &JobKey) -> RemoteResult<Vec<Trigger>> {
        self.check("triggers_of_job")?;
        let state = self.state();
        let mut triggers: Vec<Trigger> = state
            .triggers
            .iter()
            .filter(|w| w.job_key() == key)
            .map(|w| w.trigger().clone())
            .collect();
        triggers.sort_by(|a, b| a.key().cmp(b.key()));
        Ok(triggers)
    }

    async fn trigger_group_names(&self) -> RemoteResult<Vec<String>> {
        self.check("trigger_group_names")?;
        let state = self.state();
        Ok(sorted(
            state.triggers.iter().map(|w| w.key().group().to_string()),
        ))
    }

    async fn trigger_keys(&self, matcher: &GroupMatcher) -> RemoteResult<HashSet<TriggerKey>> {
        self.check("trigger_keys")?;
        let state = self.state();
        Ok(state
            .triggers
            .iter()
            .filter(|w| matcher.matches_trigger(w.key()))
            .map(|w| w.key().clone())
            .collect())
    }

    async fn job_detail(&self, key: &JobKey) -> RemoteResult<Option<JobDetail>> {
        self.check("job_detail")?;
        Ok(self.state().jobs.get(key).cloned())
    }

    async fn trigger(&self, key: &TriggerKey) -> RemoteResult<Option<Trigger>> {
        self.check("trigger")?;
        Ok(self.state().triggers.get(key).map(|w| w.trigger().clone()))
    }

    async fn trigger_state(&self, key: &TriggerKey) -> RemoteResult<TriggerState> {
        self.check("trigger_state")?;
        Ok(self
            .state()
            .triggers
            .get(key)
            .map_or(TriggerState::None, |w| w.state().public()))
    }

    async fn check_job_exists(&self, key: &JobKey) -> RemoteResult<bool> {
        self.check("check_job_exists")?;
        Ok(self.state().jobs.contains_key(key))
    }

    async fn check_trigger_exists(&self, key: &TriggerKey) -> RemoteResult<bool> {
        self.check("check_trigger_exists")?;
        Ok(self.state().triggers.contains(key))
    }

    async fn add_calendar(
        &self,
        name: &str,
        calendar: Calendar,
        replace: bool,
        _update_triggers: bool,
    ) -> RemoteResult<()> {
        self.check("add_calendar")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        if !replace && state.calendars.contains_key(name) {
            return Err(DomainError::ObjectAlreadyExists(name.to_string()).into());
        }
        state.calendars.insert(name.to_string(), calendar);
        Ok(())
    }

    async fn delete_calendar(&self, name: &str) -> RemoteResult<bool> {
        self.check("delete_calendar")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        if state
            .triggers
            .iter()
            .any(|w| w.trigger().calendar_name() == Some(name))
        {
            return Err(DomainError::JobPersistence(format!(
                "calendar '{name}' is referenced by a trigger"
            ))
            .into());
        }
        Ok(state.calendars.remove(name).is_some())
    }

    async fn calendar(&self, name: &str) -> RemoteResult<Option<Calendar>> {
        self.check("calendar")?;
        Ok(self.state().calendars.get(name).cloned())
    }

    async fn calendar_names(&self) -> RemoteResult<Vec<String>> {
        self.check("calendar_names")?;
        Ok(self.state().calendars.keys().cloned().collect())
    }

    async fn clear(&self) -> RemoteResult<()> {
        self.check("clear")?;
        let mut state = self.state();
        state.ensure_not_shutdown()?;
        state.jobs.clear();
        state.triggers.clear();
        state.calendars.clear();
        state.paused_trigger_groups.clear();
        state.paused_job_groups.clear();
        Ok(())
    }
}

/// Endpoint factory that hands out one engine and counts connections.
pub struct CountingFactory {
    endpoint: Arc<dyn RemoteScheduler>,
    connects: AtomicUsize,
    failure: Mutex<Option<ConnectionFailure>>,
}

impl CountingFactory {
    /// Create a factory that always returns `endpoint`.
    pub fn new(endpoint: Arc<dyn RemoteScheduler>) -> Arc<Self> {
        Arc::new(Self {
            endpoint,
            connects: AtomicUsize::new(0),
            failure: Mutex::new(None),
        })
    }

    /// Number of times `connect` was called, failed attempts included.
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Make every following `connect` fail with `failure`.
    pub fn fail_with(&self, failure: ConnectionFailure) {
        *lock(&self.failure) = Some(failure);
    }

    /// Make `connect` succeed again.
    pub fn succeed(&self) {
        *lock(&self.failure) = None;
    }
}

#[async_trait]
impl EndpointFactory for CountingFactory {
    async fn connect(&self) -> Result<Arc<dyn RemoteScheduler>, ConnectionFailure> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        // Yield so concurrent callers can race on an empty cache.
        tokio::task::yield_now().await;
        match lock(&self.failure).clone() {
            Some(failure) => Err(failure),
            None => Ok(Arc::clone(&self.endpoint)),
        }
    }

    fn describe(&self) -> String {
        "fake://engine".to_string()
    }
}

/// Directory that delegates to [`InMemoryDirectory`] and counts removals.
#[derive(Default)]
pub struct RecordingDirectory {
    inner: InMemoryDirectory,
    removals: Mutex<Vec<String>>,
}

impl RecordingDirectory {
    /// Create an empty directory.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Names passed to `remove`, in order, whether or not they were present.
    pub fn removals(&self) -> Vec<String> {
        lock(&self.removals).clone()
    }
}

impl SchedulerDirectory for RecordingDirectory {
    fn register(&self, name: &str, scheduler: Arc<dyn Scheduler>) -> Result<(), DirectoryError> {
        self.inner.register(name, scheduler)
    }

    fn lookup(&self, name: &str) -> Result<Option<Arc<dyn Scheduler>>, DirectoryError> {
        self.inner.lookup(name)
    }

    fn remove(&self, name: &str) -> Result<bool, DirectoryError> {
        lock(&self.removals).push(name.to_string());
        self.inner.remove(name)
    }

    fn names(&self) -> Result<Vec<String>, DirectoryError> {
        self.inner.names()
    }
}
