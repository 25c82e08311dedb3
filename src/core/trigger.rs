//! Trigger definitions and the public trigger state vocabulary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::job::JobDataMap;
use super::schedule::{ScheduleError, TriggerSchedule};
use super::types::{JobKey, TriggerKey};

/// Priority assigned when none is given.
pub const DEFAULT_PRIORITY: i32 = 5;

/// Errors that can occur when building triggers.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// Trigger name is empty.
    #[error("trigger name must not be empty")]
    EmptyName,

    /// Trigger is not bound to a job.
    #[error("trigger {0} is not bound to a job")]
    MissingJob(TriggerKey),

    /// End time precedes start time.
    #[error("trigger {0} ends before it starts")]
    EndBeforeStart(TriggerKey),

    /// Schedule is invalid.
    #[error("invalid schedule: {0}")]
    Schedule(#[from] ScheduleError),

    /// A data value could not be serialized.
    #[error("invalid trigger data for key '{key}': {source}")]
    InvalidData {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// What the engine does when a firing is missed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MisfireInstruction {
    /// Let the engine pick based on the schedule type.
    #[default]
    Smart,
    /// Fire every missed occurrence as soon as possible.
    IgnoreMisfires,
    /// Fire once immediately.
    FireNow,
    /// Skip missed occurrences and wait for the next one.
    DoNothing,
}

/// Trigger state as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerState {
    /// No such trigger.
    None,
    /// Scheduled and eligible to fire.
    Normal,
    /// Paused.
    Paused,
    /// Finished firing.
    Complete,
    /// Failed; needs a reset before it fires again.
    Error,
    /// Held back because its job disallows concurrent execution.
    Blocked,
}

/// A rule describing when a job runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    key: TriggerKey,
    job_key: JobKey,
    description: Option<String>,
    calendar_name: Option<String>,
    priority: i32,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    misfire_instruction: MisfireInstruction,
    schedule: TriggerSchedule,
    #[serde(default)]
    data: JobDataMap,
}

impl Trigger {
    /// Start building a trigger for `job_key`.
    pub fn builder(key: impl Into<TriggerKey>, job_key: impl Into<JobKey>) -> TriggerBuilder {
        TriggerBuilder::new(key.into(), job_key.into())
    }

    /// Get the trigger key.
    pub fn key(&self) -> &TriggerKey {
        &self.key
    }

    /// Get the key of the job this trigger fires.
    pub fn job_key(&self) -> &JobKey {
        &self.job_key
    }

    /// Get the description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Get the calendar name, if any.
    pub fn calendar_name(&self) -> Option<&str> {
        self.calendar_name.as_deref()
    }

    /// Get the priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Get the start time.
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Get the end time.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Get the misfire instruction.
    pub fn misfire_instruction(&self) -> MisfireInstruction {
        self.misfire_instruction
    }

    /// Get the schedule.
    pub fn schedule(&self) -> &TriggerSchedule {
        &self.schedule
    }

    /// Get the trigger data.
    pub fn data(&self) -> &JobDataMap {
        &self.data
    }

    /// Copy of this trigger bound to a different job.
    pub fn for_job(&self, job_key: JobKey) -> Trigger {
        Trigger {
            job_key,
            ..self.clone()
        }
    }
}

/// Builder for [`Trigger`].
#[derive(Debug)]
pub struct TriggerBuilder {
    trigger: Trigger,
    data_error: Option<TriggerError>,
}

impl TriggerBuilder {
    fn new(key: TriggerKey, job_key: JobKey) -> Self {
        Self {
            trigger: Trigger {
                key,
                job_key,
                description: None,
                calendar_name: None,
                priority: DEFAULT_PRIORITY,
                start_time: Utc::now(),
                end_time: None,
                misfire_instruction: MisfireInstruction::default(),
                schedule: TriggerSchedule::once(),
                data: HashMap::new(),
            },
            data_error: None,
        }
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.trigger.description = Some(description.into());
        self
    }

    /// Exclude times using a named calendar.
    pub fn calendar(mut self, name: impl Into<String>) -> Self {
        self.trigger.calendar_name = Some(name.into());
        self
    }

    /// Set the priority.
    pub fn priority(mut self, priority: i32) -> Self {
        self.trigger.priority = priority;
        self
    }

    /// Set the start time.
    pub fn start_at(mut self, start: DateTime<Utc>) -> Self {
        self.trigger.start_time = start;
        self
    }

    /// Set the end time.
    pub fn end_at(mut self, end: DateTime<Utc>) -> Self {
        self.trigger.end_time = Some(end);
        self
    }

    /// Set the misfire instruction.
    pub fn misfire(mut self, instruction: MisfireInstruction) -> Self {
        self.trigger.misfire_instruction = instruction;
        self
    }

    /// Set the schedule.
    pub fn schedule(mut self, schedule: TriggerSchedule) -> Self {
        self.trigger.schedule = schedule;
        self
    }

    /// Add a data value.
    pub fn data<T: Serialize>(mut self, key: impl Into<String>, value: T) -> Self {
        let key = key.into();
        match serde_json::to_value(value) {
            Ok(value) => {
                self.trigger.data.insert(key, value);
            }
            Err(source) => {
                self.data_error
                    .get_or_insert(TriggerError::InvalidData { key, source });
            }
        }
        self
    }

    /// Validate and build the trigger.
    pub fn build(self) -> Result<Trigger, TriggerError> {
        if let Some(err) = self.data_error {
            return Err(err);
        }
        let trigger = self.trigger;
        if trigger.key.name().trim().is_empty() {
            return Err(TriggerError::EmptyName);
        }
        if trigger.job_key.name().trim().is_empty() {
            return Err(TriggerError::MissingJob(trigger.key));
        }
        if let Some(end) = trigger.end_time
            && end < trigger.start_time
        {
            return Err(TriggerError::EndBeforeStart(trigger.key));
        }
        trigger.schedule.validate()?;
        Ok(trigger)
    }
}
