//! Lazily built, self-invalidating reference to the remote endpoint.
//!
//! The cached reference is the only shared mutable state of a proxy. The lock
//! guarding it is held only while reading, installing or clearing the cache,
//! never across the factory call or a remote call, so concurrent callers do
//! not queue behind each other's network latency.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::endpoint::{EndpointFactory, RemoteScheduler};
use super::error::ConnectionError;

type Cached = Option<Arc<dyn RemoteScheduler>>;

/// Handle to a remote scheduler, connected on first use.
pub struct ConnectionHandle {
    cached: Mutex<Cached>,
    factory: Arc<dyn EndpointFactory>,
}

impl ConnectionHandle {
    /// Create a handle; nothing is connected until [`get`](Self::get).
    pub fn new(factory: Arc<dyn EndpointFactory>) -> Self {
        Self {
            cached: Mutex::new(None),
            factory,
        }
    }

    /// Return the cached endpoint, connecting through the factory if there is
    /// none. A factory failure leaves the cache empty.
    pub async fn get(&self) -> Result<Arc<dyn RemoteScheduler>, ConnectionError> {
        let cached = self.lock().clone();
        if let Some(remote) = cached {
            return Ok(remote);
        }

        // Racing callers may both connect here; the last one installed wins.
        let remote = self
            .factory
            .connect()
            .await
            .map_err(|e| ConnectionError::new(self.factory.describe(), e))?;

        tracing::debug!(endpoint = %self.factory.describe(), "Connected to remote scheduler");
        *self.lock() = Some(Arc::clone(&remote));
        Ok(remote)
    }

    /// Drop the cached endpoint so the next [`get`](Self::get) reconnects.
    pub fn invalidate(&self) {
        if self.lock().take().is_some() {
            tracing::debug!(endpoint = %self.factory.describe(), "Discarded remote scheduler handle");
        }
    }

    /// Whether an endpoint is currently cached.
    pub fn is_connected(&self) -> bool {
        self.lock().is_some()
    }

    /// Description of the endpoint this handle connects to.
    pub fn endpoint(&self) -> String {
        self.factory.describe()
    }

    // The guarded value is a plain Option, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Cached> {
        self.cached.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("endpoint", &self.factory.describe())
            .field("connected", &self.is_connected())
            .finish()
    }
}
