//! Calendars exclude dates from trigger firing.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::schedule::ScheduleError;

/// A set of whole days on which triggers referencing the calendar do not fire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    description: Option<String>,
    /// Timezone the excluded days are evaluated in; UTC when unset.
    timezone: Option<String>,
    excluded_days: BTreeSet<NaiveDate>,
}

impl Calendar {
    /// Create an empty calendar that excludes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Evaluate excluded days in a timezone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Result<Self, ScheduleError> {
        let timezone = timezone.into();
        timezone
            .parse::<Tz>()
            .map_err(|_| ScheduleError::InvalidTimezone(timezone.clone()))?;
        self.timezone = Some(timezone);
        Ok(self)
    }

    /// Exclude a day.
    pub fn exclude(mut self, day: NaiveDate) -> Self {
        self.excluded_days.insert(day);
        self
    }

    /// Get the description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Get the excluded days in ascending order.
    pub fn excluded_days(&self) -> impl Iterator<Item = &NaiveDate> {
        self.excluded_days.iter()
    }

    /// Whether a trigger using this calendar may fire at `time`.
    pub fn is_time_included(&self, time: DateTime<Utc>) -> bool {
        let day = match self.timezone.as_deref().and_then(|tz| tz.parse::<Tz>().ok()) {
            Some(tz) => time.with_timezone(&tz).date_naive(),
            None => time.date_naive(),
        };
        !self.excluded_days.contains(&day)
    }
}
