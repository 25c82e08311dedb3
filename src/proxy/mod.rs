//! Local proxy for a scheduler running in another process.
//!
//! [`RemoteSchedulerProxy`] implements [`Scheduler`](crate::scheduler::Scheduler)
//! by forwarding each call to a [`RemoteScheduler`] obtained from a
//! [`ConnectionHandle`]. Transport failures drop the handle and surface as
//! [`SchedulerError::Communication`]; the next call reconnects. Nothing is
//! retried automatically.

mod forward;
mod translate;

use std::future::Future;
use std::sync::Arc;

use crate::config::{EndpointConfig, ProxyConfig};
use crate::directory::{DirectoryError, SchedulerDirectory};
use crate::remote::{
    ConnectionFailure, ConnectionHandle, EndpointFactory, FnFactory, RemoteResult,
    RemoteScheduler,
};
use crate::scheduler::{
    InterruptFailure, InterruptTarget, Scheduler, SchedulerError, UnableToInterruptError,
};

use translate::ErrorTranslator;

/// Scheduler API backed by a remote engine.
pub struct RemoteSchedulerProxy {
    scheduler_id: String,
    handle: ConnectionHandle,
    directory: Arc<dyn SchedulerDirectory>,
}

impl RemoteSchedulerProxy {
    /// Create a proxy for the scheduler named `scheduler_id`.
    ///
    /// No connection is made until the first call.
    pub fn new(
        scheduler_id: impl Into<String>,
        factory: Arc<dyn EndpointFactory>,
        directory: Arc<dyn SchedulerDirectory>,
    ) -> Self {
        Self {
            scheduler_id: scheduler_id.into(),
            handle: ConnectionHandle::new(factory),
            directory,
        }
    }

    /// Create a proxy from configuration. `connect` is called with the
    /// endpoint settings whenever a new connection is needed.
    pub fn from_config<F>(
        config: &ProxyConfig,
        connect: F,
        directory: Arc<dyn SchedulerDirectory>,
    ) -> Self
    where
        F: Fn(&EndpointConfig) -> Result<Arc<dyn RemoteScheduler>, ConnectionFailure>
            + Send
            + Sync
            + 'static,
    {
        let endpoint = config.endpoint.clone();
        let factory = FnFactory::new(endpoint.address(&config.scheduler_name), move || {
            connect(&endpoint)
        });
        Self::new(config.scheduler_name.clone(), Arc::new(factory), directory)
    }

    /// Name this proxy is known by in the directory and in error messages.
    pub fn scheduler_id(&self) -> &str {
        &self.scheduler_id
    }

    /// Whether an endpoint reference is currently cached.
    pub fn is_connected(&self) -> bool {
        self.handle.is_connected()
    }

    /// Register this proxy in its directory under its scheduler id.
    ///
    /// The directory then holds a strong reference to the proxy while the
    /// proxy holds one to the directory. The cycle is broken when a
    /// successful [`shutdown`](Scheduler::shutdown) removes the entry, or by
    /// removing the name from the directory directly. A proxy that is
    /// registered and never shut down lives as long as its directory.
    pub fn register(self: &Arc<Self>) -> Result<(), DirectoryError> {
        let scheduler: Arc<dyn Scheduler> = Arc::<Self>::clone(self);
        self.directory.register(&self.scheduler_id, scheduler)
    }

    fn translator(&self) -> ErrorTranslator<'_> {
        ErrorTranslator::new(&self.scheduler_id, &self.handle)
    }

    /// Fetch the endpoint, run `call` against it and translate any failure.
    async fn forward<T, F, Fut>(&self, operation: &'static str, call: F) -> Result<T, SchedulerError>
    where
        F: FnOnce(Arc<dyn RemoteScheduler>) -> Fut,
        Fut: Future<Output = RemoteResult<T>>,
    {
        let remote = self.handle.get().await?;
        call(remote)
            .await
            .map_err(|e| self.translator().translate(operation, e))
    }

    /// Like [`forward`](Self::forward), but every failure becomes an
    /// [`UnableToInterruptError`].
    async fn forward_interrupt<F, Fut>(
        &self,
        target: InterruptTarget,
        operation: &'static str,
        call: F,
    ) -> Result<bool, UnableToInterruptError>
    where
        F: FnOnce(Arc<dyn RemoteScheduler>) -> Fut,
        Fut: Future<Output = RemoteResult<bool>>,
    {
        let remote = match self.handle.get().await {
            Ok(remote) => remote,
            Err(e) => {
                return Err(UnableToInterruptError::new(
                    target,
                    InterruptFailure::Connection(e),
                ));
            }
        };
        call(remote)
            .await
            .map_err(|e| self.translator().translate_interrupt(target, operation, e))
    }

    fn deregister(&self) {
        match self.directory.remove(&self.scheduler_id) {
            Ok(true) => {
                tracing::info!(scheduler = %self.scheduler_id, "Removed scheduler from directory after shutdown");
            }
            Ok(false) => {
                tracing::debug!(scheduler = %self.scheduler_id, "Scheduler was not registered in directory");
            }
            Err(e) => {
                tracing::warn!(scheduler = %self.scheduler_id, error = %e, "Failed to remove scheduler from directory");
            }
        }
    }
}

impl std::fmt::Debug for RemoteSchedulerProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSchedulerProxy")
            .field("scheduler_id", &self.scheduler_id)
            .field("handle", &self.handle)
            .finish()
    }
}
