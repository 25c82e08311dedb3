//! Trigger schedules.
//!
//! A schedule is carried inside a [`Trigger`](super::trigger::Trigger) and
//! shipped to the remote engine as data. Validation happens locally so that
//! malformed cron expressions or timezones are rejected before a round trip.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule as CronSchedule;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when parsing or using schedules.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Invalid cron expression.
    #[error("invalid cron expression: {0}")]
    InvalidCron(String),

    /// Invalid repeat interval.
    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    /// Invalid timezone.
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    /// No more occurrences.
    #[error("no more occurrences")]
    NoMoreOccurrences,
}

/// When a trigger fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerSchedule {
    /// Fire every `interval`, `repeat_count` more times after the first firing
    /// (`None` repeats forever).
    Simple {
        interval: Duration,
        repeat_count: Option<u32>,
    },
    /// Fire on a cron expression evaluated in `timezone`.
    Cron { expression: String, timezone: String },
}

impl TriggerSchedule {
    /// Fire exactly once at the trigger's start time.
    pub fn once() -> Self {
        TriggerSchedule::Simple {
            interval: Duration::ZERO,
            repeat_count: Some(0),
        }
    }

    /// Repeat forever at a fixed interval.
    pub fn every(interval: Duration) -> Self {
        TriggerSchedule::Simple {
            interval,
            repeat_count: None,
        }
    }

    /// Repeat `repeat_count` times after the first firing.
    pub fn repeat(interval: Duration, repeat_count: u32) -> Self {
        TriggerSchedule::Simple {
            interval,
            repeat_count: Some(repeat_count),
        }
    }

    /// Cron schedule evaluated in UTC.
    ///
    /// Accepts standard 5-field expressions and 6-field expressions with a
    /// leading seconds field.
    pub fn cron(expression: impl Into<String>) -> Result<Self, ScheduleError> {
        Self::cron_with_timezone(expression, "UTC")
    }

    /// Cron schedule evaluated in a specific timezone.
    pub fn cron_with_timezone(
        expression: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Result<Self, ScheduleError> {
        let schedule = TriggerSchedule::Cron {
            expression: expression.into(),
            timezone: timezone.into(),
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Check that the schedule can be evaluated.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        match self {
            TriggerSchedule::Simple {
                interval,
                repeat_count,
            } => {
                let repeats = repeat_count.is_none_or(|n| n > 0);
                if repeats && interval.is_zero() {
                    return Err(ScheduleError::InvalidInterval(
                        "repeating schedule needs a non-zero interval".to_string(),
                    ));
                }
                Ok(())
            }
            TriggerSchedule::Cron {
                expression,
                timezone,
            } => {
                parse_timezone(timezone)?;
                parse_cron(expression)?;
                Ok(())
            }
        }
    }

    /// First firing at or after `start`.
    pub fn first_fire_time(&self, start: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError> {
        match self {
            TriggerSchedule::Simple { .. } => Ok(start),
            TriggerSchedule::Cron { .. } => {
                let before = start
                    .checked_sub_signed(chrono::Duration::seconds(1))
                    .ok_or(ScheduleError::NoMoreOccurrences)?;
                self.next_fire_after(before)
            }
        }
    }

    /// Next firing strictly after `after`, ignoring repeat limits.
    pub fn next_fire_after(&self, after: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError> {
        match self {
            TriggerSchedule::Simple { interval, .. } => {
                let step = chrono::Duration::from_std(*interval)
                    .map_err(|e| ScheduleError::InvalidInterval(e.to_string()))?;
                after
                    .checked_add_signed(step)
                    .ok_or(ScheduleError::NoMoreOccurrences)
            }
            TriggerSchedule::Cron {
                expression,
                timezone,
            } => {
                let tz = parse_timezone(timezone)?;
                let schedule = parse_cron(expression)?;
                let local_time = after.with_timezone(&tz);
                schedule
                    .after(&local_time)
                    .next()
                    .map(|dt| dt.with_timezone(&Utc))
                    .ok_or(ScheduleError::NoMoreOccurrences)
            }
        }
    }
}

fn parse_timezone(timezone: &str) -> Result<Tz, ScheduleError> {
    timezone
        .parse::<Tz>()
        .map_err(|_| ScheduleError::InvalidTimezone(timezone.to_string()))
}

fn parse_cron(expression: &str) -> Result<CronSchedule, ScheduleError> {
    let fields: Vec<&str> = expression.split_whitespace().collect();

    let cron_expr = match fields.len() {
        5 => format!("0 {}", expression.trim()),
        6 | 7 => expression.trim().to_string(),
        _ => {
            return Err(ScheduleError::InvalidCron(format!(
                "expected 5, 6 or 7 fields, got {}",
                fields.len()
            )));
        }
    };

    CronSchedule::from_str(&cron_expr).map_err(|e| ScheduleError::InvalidCron(e.to_string()))
}
