//! Interrupt integration tests.
//!
//! Every interrupt failure is reported as an `UnableToInterruptError`, and
//! its cause tells an engine refusal apart from a transport failure.

use crate::common::{durable_job, fixture};
use chrono::Utc;
use petit_remote::remote::{ConnectionFailure, DomainError, TransportError};
use petit_remote::{ExecutingJob, InterruptFailure, InterruptTarget, JobKey, Scheduler, TriggerKey};
use std::time::Duration;

fn running(job: &str, fire_instance_id: &str) -> ExecutingJob {
    ExecutingJob {
        fire_instance_id: fire_instance_id.to_string(),
        job_key: JobKey::new(job),
        trigger_key: TriggerKey::new(format!("{job}-trigger")),
        fire_time: Utc::now(),
        scheduled_fire_time: None,
        refire_count: 0,
    }
}

#[tokio::test]
async fn test_interrupt_running_job() {
    let f = fixture("reporting");
    f.proxy.add_job(durable_job("report"), false).await.unwrap();
    f.engine.add_executing(running("report", "fire-1"));

    assert!(f.proxy.interrupt(&"report".into()).await.unwrap());
    assert!(!f.proxy.interrupt(&"report".into()).await.unwrap());
    assert!(f.proxy.currently_executing_jobs().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_interrupt_instance() {
    let f = fixture("reporting");
    f.engine.add_executing(running("report", "fire-1"));
    f.engine.add_executing(running("report", "fire-2"));

    assert!(f.proxy.interrupt_instance("fire-2").await.unwrap());
    let still_running = f.proxy.currently_executing_jobs().await.unwrap();
    assert_eq!(still_running.len(), 1);
    assert_eq!(still_running[0].fire_instance_id, "fire-1");
}

#[tokio::test]
async fn test_engine_refusal() {
    let f = fixture("reporting");
    f.engine.fail_operation(
        "interrupt",
        DomainError::UnableToInterrupt("job does not support interruption".into()),
    );

    let err = f.proxy.interrupt(&"report".into()).await.unwrap_err();

    assert_eq!(err.target(), &InterruptTarget::Job(JobKey::new("report")));
    assert!(matches!(
        err.cause(),
        InterruptFailure::Engine(DomainError::UnableToInterrupt(_))
    ));
    assert!(f.proxy.is_connected());
}

#[tokio::test]
async fn test_transport_failure() {
    let f = fixture("reporting");
    f.engine
        .fail_next(TransportError::Timeout(Duration::from_secs(10)));

    let err = f.proxy.interrupt_instance("fire-9").await.unwrap_err();

    assert_eq!(err.target(), &InterruptTarget::Instance("fire-9".into()));
    match err.cause() {
        InterruptFailure::Communication(c) => {
            assert_eq!(c.scheduler(), "reporting");
            assert_eq!(c.operation(), "interrupt_instance");
        }
        other => panic!("expected communication failure, got {other:?}"),
    }
    assert!(err.to_string().contains("fire instance fire-9"));
    assert!(!f.proxy.is_connected());
}

#[tokio::test]
async fn test_connection_failure() {
    let f = fixture("reporting");
    f.factory
        .fail_with(ConnectionFailure::Refused("maintenance".into()));

    let err = f.proxy.interrupt(&"report".into()).await.unwrap_err();

    assert!(matches!(err.cause(), InterruptFailure::Connection(_)));
    assert_eq!(f.engine.call_count(), 0);
}
