//! Classifies endpoint failures and discards stale handles.

use crate::remote::{ConnectionHandle, RemoteError, TransportError};
use crate::scheduler::{
    CommunicationError, InterruptFailure, InterruptTarget, SchedulerError, UnableToInterruptError,
};

/// Translates [`RemoteError`]s for one proxy.
///
/// A transport failure invalidates the handle exactly once, before the
/// translated error is returned. Domain failures pass through untouched.
pub(crate) struct ErrorTranslator<'a> {
    scheduler_id: &'a str,
    handle: &'a ConnectionHandle,
}

impl<'a> ErrorTranslator<'a> {
    pub(crate) fn new(scheduler_id: &'a str, handle: &'a ConnectionHandle) -> Self {
        Self {
            scheduler_id,
            handle,
        }
    }

    pub(crate) fn translate(&self, operation: &'static str, err: RemoteError) -> SchedulerError {
        match err {
            RemoteError::Communication(source) => self.communication(operation, source).into(),
            RemoteError::Domain(domain) => domain.into(),
        }
    }

    pub(crate) fn translate_interrupt(
        &self,
        target: InterruptTarget,
        operation: &'static str,
        err: RemoteError,
    ) -> UnableToInterruptError {
        let cause = match err {
            RemoteError::Communication(source) => {
                InterruptFailure::Communication(self.communication(operation, source))
            }
            RemoteError::Domain(domain) => InterruptFailure::Engine(domain),
        };
        UnableToInterruptError::new(target, cause)
    }

    fn communication(&self, operation: &'static str, source: TransportError) -> CommunicationError {
        tracing::warn!(
            scheduler = %self.scheduler_id,
            endpoint = %self.handle.endpoint(),
            operation,
            error = %source,
            "Remote scheduler call failed, discarding handle"
        );
        self.handle.invalidate();
        CommunicationError::new(self.scheduler_id, operation, source)
    }
}
