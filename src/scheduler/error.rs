//! Caller-facing scheduler errors.
//!
//! These separate "the engine could not be reached" from "the engine said no",
//! so callers can decide whether a retry after reconnecting makes sense.

use thiserror::Error;

use crate::core::types::JobKey;
use crate::remote::{ConnectionError, DomainError, TransportError};

/// Errors returned by [`Scheduler`](super::Scheduler) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// No endpoint reference could be obtained.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// The call failed in transit; the proxy has dropped its handle.
    #[error(transparent)]
    Communication(#[from] CommunicationError),

    /// The engine rejected the call.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The operation only makes sense inside the engine's own process.
    #[error(transparent)]
    Unsupported(#[from] UnsupportedOperation),
}

impl SchedulerError {
    /// Whether retrying after a reconnect could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SchedulerError::Connection(_) | SchedulerError::Communication(_)
        )
    }
}

/// A transport failure during an otherwise valid call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("communication with remote scheduler '{scheduler}' failed during {operation}: {source}")]
pub struct CommunicationError {
    scheduler: String,
    operation: &'static str,
    #[source]
    source: TransportError,
}

impl CommunicationError {
    pub(crate) fn new(
        scheduler: impl Into<String>,
        operation: &'static str,
        source: TransportError,
    ) -> Self {
        Self {
            scheduler: scheduler.into(),
            operation,
            source,
        }
    }

    /// Name of the scheduler that could not be reached.
    pub fn scheduler(&self) -> &str {
        &self.scheduler
    }

    /// Operation that was in flight.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// The underlying transport failure.
    pub fn transport(&self) -> &TransportError {
        &self.source
    }
}

/// An operation that cannot be proxied across a process boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("operation '{operation}' is not supported by a remote scheduler proxy: {reason}")]
pub struct UnsupportedOperation {
    operation: &'static str,
    reason: &'static str,
}

impl UnsupportedOperation {
    pub(crate) fn new(operation: &'static str, reason: &'static str) -> Self {
        Self { operation, reason }
    }

    /// Name of the rejected operation.
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

/// What an interrupt request was aimed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterruptTarget {
    /// All running instances of a job.
    Job(JobKey),
    /// A single firing.
    Instance(String),
}

impl std::fmt::Display for InterruptTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterruptTarget::Job(key) => write!(f, "job {}", key),
            InterruptTarget::Instance(id) => write!(f, "fire instance {}", id),
        }
    }
}

/// Why an interrupt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterruptFailure {
    /// The engine reported it could not interrupt.
    #[error(transparent)]
    Engine(DomainError),

    /// The interrupt request was lost in transit.
    #[error(transparent)]
    Communication(CommunicationError),

    /// No endpoint reference could be obtained.
    #[error(transparent)]
    Connection(ConnectionError),
}

/// An interrupt request could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to interrupt {target}: {cause}")]
pub struct UnableToInterruptError {
    target: InterruptTarget,
    #[source]
    cause: InterruptFailure,
}

impl UnableToInterruptError {
    pub(crate) fn new(target: InterruptTarget, cause: InterruptFailure) -> Self {
        Self { target, cause }
    }

    /// What the interrupt was aimed at.
    pub fn target(&self) -> &InterruptTarget {
        &self.target
    }

    /// Why the interrupt failed.
    pub fn cause(&self) -> &InterruptFailure {
        &self.cause
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::ConnectionFailure;

    #[test]
    fn test_communication_error_names_scheduler() {
        let err = CommunicationError::new(
            "reporting",
            "pause_all",
            TransportError::Disconnected("reset by peer".into()),
        );

        let msg = err.to_string();
        assert!(msg.contains("'reporting'"));
        assert!(msg.contains("pause_all"));
        assert!(msg.contains("reset by peer"));
    }

    #[test]
    fn test_domain_error_is_transparent() {
        let domain = DomainError::JobNotFound(JobKey::new("j"));
        let err = SchedulerError::from(domain.clone());
        assert_eq!(err.to_string(), domain.to_string());
        assert!(!err.is_transient());
    }

    #[test]
    fn test_transient_classification() {
        let conn = ConnectionError::new("x", ConnectionFailure::Refused("no".into()));
        assert!(SchedulerError::from(conn).is_transient());

        let unsupported = UnsupportedOperation::new("listener_manager", "local only");
        assert!(!SchedulerError::from(unsupported).is_transient());
    }

    #[test]
    fn test_unable_to_interrupt_display() {
        let err = UnableToInterruptError::new(
            InterruptTarget::Instance("fire-1".into()),
            InterruptFailure::Engine(DomainError::UnableToInterrupt("not interruptible".into())),
        );
        assert!(err.to_string().contains("fire instance fire-1"));
        assert!(matches!(err.cause(), InterruptFailure::Engine(_)));
    }
}
