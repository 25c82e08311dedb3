//! Connection lifecycle integration tests.
//!
//! The proxy connects on first use, keeps the endpoint while calls succeed,
//! and drops it after a transport failure so the next call reconnects.

use crate::common::{durable_job, fixture};
use petit_remote::remote::{ConnectionFailure, DomainError, TransportError};
use petit_remote::{Scheduler, SchedulerError};
use std::time::Duration;

#[tokio::test]
async fn test_connects_lazily_and_caches() {
    let f = fixture("reporting");
    assert!(!f.proxy.is_connected());
    assert_eq!(f.factory.connect_count(), 0);

    assert_eq!(f.proxy.scheduler_name().await.unwrap(), "reporting");
    assert!(f.proxy.is_started().await.is_ok());
    assert!(f.proxy.job_group_names().await.unwrap().is_empty());

    assert!(f.proxy.is_connected());
    assert_eq!(f.factory.connect_count(), 1);
}

#[tokio::test]
async fn test_transport_failure_drops_handle_then_reconnects() {
    let f = fixture("reporting");
    f.proxy.start().await.unwrap();

    f.engine
        .fail_next(TransportError::Disconnected("connection reset".into()));
    let err = f.proxy.pause_all().await.unwrap_err();

    match &err {
        SchedulerError::Communication(c) => {
            assert_eq!(c.scheduler(), "reporting");
            assert_eq!(c.operation(), "pause_all");
            assert_eq!(
                c.transport(),
                &TransportError::Disconnected("connection reset".into())
            );
        }
        other => panic!("expected communication error, got {other:?}"),
    }
    assert!(err.is_transient());
    assert!(err.to_string().contains("'reporting'"));
    assert!(!f.proxy.is_connected());

    // The failed call is not retried; the next one reconnects.
    assert_eq!(f.engine.calls(), vec!["start", "pause_all"]);
    f.proxy.pause_all().await.unwrap();
    assert_eq!(f.factory.connect_count(), 2);
}

#[tokio::test]
async fn test_timeout_is_a_transport_failure() {
    let f = fixture("reporting");
    f.engine
        .fail_next(TransportError::Timeout(Duration::from_secs(30)));

    let err = f.proxy.calendar_names().await.unwrap_err();
    assert!(matches!(err, SchedulerError::Communication(_)));
    assert!(!f.proxy.is_connected());
}

#[tokio::test]
async fn test_domain_failure_keeps_handle() {
    let f = fixture("reporting");

    let err = f
        .proxy
        .trigger_job(&"missing".into(), None)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        SchedulerError::Domain(DomainError::JobNotFound("missing".into()))
    );
    assert!(!err.is_transient());
    assert!(f.proxy.is_connected());

    f.proxy.add_job(durable_job("present"), false).await.unwrap();
    f.proxy
        .trigger_job(&"present".into(), None)
        .await
        .unwrap();
    assert_eq!(f.factory.connect_count(), 1);
}

#[tokio::test]
async fn test_connection_failure_is_reported_and_retried_next_call() {
    let f = fixture("reporting");
    f.factory
        .fail_with(ConnectionFailure::Lookup("reporting".into()));

    let err = f.proxy.standby().await.unwrap_err();
    match &err {
        SchedulerError::Connection(c) => {
            assert_eq!(c.endpoint(), "fake://engine");
            assert_eq!(c.failure(), &ConnectionFailure::Lookup("reporting".into()));
        }
        other => panic!("expected connection error, got {other:?}"),
    }
    assert_eq!(f.engine.call_count(), 0);

    f.factory.succeed();
    f.proxy.standby().await.unwrap();
    assert_eq!(f.factory.connect_count(), 2);
}

#[tokio::test]
async fn test_concurrent_calls_after_failure_all_recover() {
    let f = fixture("reporting");
    f.proxy.start().await.unwrap();
    f.engine
        .fail_next(TransportError::Io("broken pipe".into()));
    assert!(f.proxy.is_shutdown().await.is_err());

    let mut tasks = Vec::new();
    for _ in 0..4 {
        let proxy = f.proxy.clone();
        tasks.push(tokio::spawn(async move { proxy.is_in_standby_mode().await }));
    }
    for task in tasks {
        assert!(!task.await.unwrap().unwrap());
    }
    assert!(f.proxy.is_connected());
    assert!(f.factory.connect_count() >= 2);
}
