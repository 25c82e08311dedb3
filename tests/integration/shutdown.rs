//! Shutdown ordering integration tests.
//!
//! The proxy removes itself from the directory only after the engine has
//! confirmed the shutdown.

use crate::common::fixture;
use petit_remote::remote::{DomainError, TransportError};
use petit_remote::testing::{CountingFactory, FakeEngine, RecordingDirectory};
use petit_remote::{
    RemoteScheduler, RemoteSchedulerProxy, Scheduler, SchedulerDirectory, SchedulerError,
};

#[tokio::test]
async fn test_successful_shutdown_deregisters() {
    let f = fixture("reporting");
    f.proxy.start().await.unwrap();
    assert!(f.directory.lookup("reporting").unwrap().is_some());

    f.proxy.shutdown(true).await.unwrap();

    assert!(f.engine.is_shutdown().await.unwrap());
    assert!(f.directory.lookup("reporting").unwrap().is_none());
    assert_eq!(f.directory.removals(), vec!["reporting"]);
}

#[tokio::test]
async fn test_transport_failure_during_shutdown_keeps_registration() {
    let f = fixture("reporting");
    f.engine
        .fail_next(TransportError::Disconnected("eof".into()));

    let err = f.proxy.shutdown(false).await.unwrap_err();

    assert!(matches!(err, SchedulerError::Communication(_)));
    assert!(f.directory.lookup("reporting").unwrap().is_some());
    assert!(f.directory.removals().is_empty());
    assert!(!f.proxy.is_connected());
}

#[tokio::test]
async fn test_engine_rejection_during_shutdown_keeps_registration() {
    let f = fixture("reporting");
    f.engine
        .fail_operation("shutdown", DomainError::Other("jobs still running".into()));

    let err = f.proxy.shutdown(true).await.unwrap_err();

    assert_eq!(
        err,
        SchedulerError::Domain(DomainError::Other("jobs still running".into()))
    );
    assert!(f.directory.lookup("reporting").unwrap().is_some());
    assert!(f.proxy.is_connected());
}

#[tokio::test]
async fn test_retry_after_failed_shutdown_deregisters() {
    let f = fixture("reporting");
    f.engine.fail_next(TransportError::Io("broken pipe".into()));
    assert!(f.proxy.shutdown(true).await.is_err());

    f.proxy.shutdown(true).await.unwrap();
    assert!(f.directory.names().unwrap().is_empty());
    assert_eq!(f.factory.connect_count(), 2);
}

#[tokio::test]
async fn test_shutdown_of_unregistered_proxy_succeeds() {
    let directory = RecordingDirectory::new();
    let proxy = RemoteSchedulerProxy::new(
        "adhoc",
        CountingFactory::new(FakeEngine::new("adhoc")),
        directory.clone(),
    );

    proxy.shutdown(false).await.unwrap();
    assert_eq!(directory.removals(), vec!["adhoc"]);
}

#[tokio::test]
async fn test_engine_rejects_calls_after_shutdown() {
    let f = fixture("reporting");
    f.proxy.shutdown(true).await.unwrap();

    assert!(f.proxy.is_shutdown().await.unwrap());
    assert_eq!(
        f.proxy.start().await.unwrap_err(),
        SchedulerError::Domain(DomainError::SchedulerShutdown)
    );
}
