//! Failure vocabulary of the remote boundary.
//!
//! Every endpoint call returns a [`RemoteError`] on failure, which is either a
//! transport failure or a rejection raised by the engine itself. Keeping the
//! two apart is what lets the proxy decide whether its handle is stale.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{JobKey, TriggerKey};

/// The channel to the engine failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The peer went away or the channel was closed.
    #[error("disconnected: {0}")]
    Disconnected(String),

    /// The call did not complete in time.
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Socket or pipe I/O failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// The peer sent something unintelligible.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::Io(err.to_string())
    }
}

/// The engine rejected a request.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DomainError {
    /// Job not found.
    #[error("job not found: {0}")]
    JobNotFound(JobKey),

    /// Trigger not found.
    #[error("trigger not found: {0}")]
    TriggerNotFound(TriggerKey),

    /// Calendar not found.
    #[error("calendar not found: {0}")]
    CalendarNotFound(String),

    /// An object with the same key is already stored.
    #[error("object already exists: {0}")]
    ObjectAlreadyExists(String),

    /// The engine's job store failed.
    #[error("job persistence error: {0}")]
    JobPersistence(String),

    /// The engine has been shut down.
    #[error("scheduler has been shut down")]
    SchedulerShutdown,

    /// A request argument was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The engine could not interrupt a running job.
    #[error("unable to interrupt job: {0}")]
    UnableToInterrupt(String),

    /// Any other engine-side failure.
    #[error("scheduler error: {0}")]
    Other(String),
}

/// Failure returned by a remote endpoint call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Transport failure; the endpoint reference should be considered stale.
    #[error("communication failure: {0}")]
    Communication(#[from] TransportError),

    /// The engine processed the call and rejected it.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Result type of every endpoint call.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Why an endpoint factory could not produce a reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionFailure {
    /// The endpoint name could not be resolved.
    #[error("lookup of '{0}' failed")]
    Lookup(String),

    /// The endpoint refused the connection.
    #[error("connection refused: {0}")]
    Refused(String),

    /// Transport failure while connecting.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// A reference to the remote scheduler could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not get handle to remote scheduler at {endpoint}: {source}")]
pub struct ConnectionError {
    endpoint: String,
    #[source]
    source: ConnectionFailure,
}

impl ConnectionError {
    /// Create a connection error for an endpoint.
    pub fn new(endpoint: impl Into<String>, source: ConnectionFailure) -> Self {
        Self {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// Description of the endpoint that could not be reached.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The factory's failure.
    pub fn failure(&self) -> &ConnectionFailure {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_remote_error_classification() {
        let err: RemoteError = TransportError::Disconnected("reset".into()).into();
        assert!(matches!(err, RemoteError::Communication(_)));

        let err: RemoteError = DomainError::JobNotFound(JobKey::new("j")).into();
        assert!(matches!(err, RemoteError::Domain(_)));
    }

    #[test]
    fn test_domain_error_display_is_passthrough() {
        let domain = DomainError::TriggerNotFound(TriggerKey::new("t"));
        let err = RemoteError::Domain(domain.clone());
        assert_eq!(err.to_string(), domain.to_string());
    }

    #[test]
    fn test_connection_error_keeps_source() {
        let err = ConnectionError::new("localhost:1099/sched", ConnectionFailure::Lookup("sched".into()));

        assert!(err.to_string().contains("localhost:1099/sched"));
        assert_eq!(err.source().unwrap().to_string(), "lookup of 'sched' failed");
    }

    #[test]
    fn test_domain_error_serializes() {
        let err = DomainError::ObjectAlreadyExists("DEFAULT.job".into());
        let json = serde_json::to_string(&err).unwrap();
        let back: DomainError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
