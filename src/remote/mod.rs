//! Remote boundary: endpoint contract, connection handle, and failure types.

mod connection;
mod endpoint;
mod error;

pub use connection::ConnectionHandle;
pub use endpoint::{EndpointFactory, FnFactory, RemoteScheduler};
pub use error::{
    ConnectionError, ConnectionFailure, DomainError, RemoteError, RemoteResult, TransportError,
};
