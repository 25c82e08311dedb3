//! Job definitions.
//!
//! A [`JobDetail`] describes a unit of work registered with the remote engine.
//! The proxy never executes jobs; it only ships their definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use super::types::JobKey;

/// Free-form data attached to jobs and triggers.
pub type JobDataMap = HashMap<String, Value>;

/// Errors that can occur when building jobs.
#[derive(Debug, Error)]
pub enum JobError {
    /// Job name is empty.
    #[error("job name must not be empty")]
    EmptyName,

    /// Job type is empty.
    #[error("job type must not be empty for job: {0}")]
    MissingJobType(JobKey),

    /// A data value could not be serialized.
    #[error("invalid job data for key '{key}': {source}")]
    InvalidData {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A job definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetail {
    key: JobKey,
    description: Option<String>,
    /// Name the remote engine resolves to an executable job implementation.
    job_type: String,
    durable: bool,
    requests_recovery: bool,
    concurrent_execution_disallowed: bool,
    #[serde(default)]
    data: JobDataMap,
}

impl JobDetail {
    /// Start building a job definition.
    pub fn builder(key: impl Into<JobKey>, job_type: impl Into<String>) -> JobDetailBuilder {
        JobDetailBuilder::new(key, job_type)
    }

    /// Get the job key.
    pub fn key(&self) -> &JobKey {
        &self.key
    }

    /// Get the description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Get the job type name.
    pub fn job_type(&self) -> &str {
        &self.job_type
    }

    /// Whether the job stays stored once no trigger references it.
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    /// Whether the engine re-executes the job after a hard shutdown.
    pub fn requests_recovery(&self) -> bool {
        self.requests_recovery
    }

    /// Whether concurrent executions of this job are disallowed.
    pub fn is_concurrent_execution_disallowed(&self) -> bool {
        self.concurrent_execution_disallowed
    }

    /// Get the job data.
    pub fn data(&self) -> &JobDataMap {
        &self.data
    }
}

/// Builder for [`JobDetail`].
#[derive(Debug)]
pub struct JobDetailBuilder {
    detail: JobDetail,
    data_error: Option<JobError>,
}

impl JobDetailBuilder {
    fn new(key: impl Into<JobKey>, job_type: impl Into<String>) -> Self {
        Self {
            detail: JobDetail {
                key: key.into(),
                description: None,
                job_type: job_type.into(),
                durable: false,
                requests_recovery: false,
                concurrent_execution_disallowed: false,
                data: HashMap::new(),
            },
            data_error: None,
        }
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.detail.description = Some(description.into());
        self
    }

    /// Keep the job stored even when no trigger references it.
    pub fn durable(mut self, durable: bool) -> Self {
        self.detail.durable = durable;
        self
    }

    /// Ask the engine to re-execute the job after a hard shutdown.
    pub fn requests_recovery(mut self, recover: bool) -> Self {
        self.detail.requests_recovery = recover;
        self
    }

    /// Disallow concurrent executions.
    pub fn disallow_concurrent_execution(mut self) -> Self {
        self.detail.concurrent_execution_disallowed = true;
        self
    }

    /// Add a data value.
    pub fn data<T: Serialize>(mut self, key: impl Into<String>, value: T) -> Self {
        let key = key.into();
        match serde_json::to_value(value) {
            Ok(value) => {
                self.detail.data.insert(key, value);
            }
            Err(source) => {
                self.data_error.get_or_insert(JobError::InvalidData { key, source });
            }
        }
        self
    }

    /// Validate and build the job definition.
    pub fn build(self) -> Result<JobDetail, JobError> {
        if let Some(err) = self.data_error {
            return Err(err);
        }
        if self.detail.key.name().trim().is_empty() {
            return Err(JobError::EmptyName);
        }
        if self.detail.job_type.trim().is_empty() {
            return Err(JobError::MissingJobType(self.detail.key));
        }
        Ok(self.detail)
    }
}
