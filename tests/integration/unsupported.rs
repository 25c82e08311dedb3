//! Local-only operations are refused without touching the engine.

use crate::common::fixture;
use async_trait::async_trait;
use petit_remote::scheduler::{Job, JobExecutionError, JobFactory};
use petit_remote::{ExecutingJob, JobDetail, Scheduler, SchedulerError};
use std::sync::Arc;

struct NoopJob;

#[async_trait]
impl Job for NoopJob {
    async fn execute(&self, _execution: &ExecutingJob) -> Result<(), JobExecutionError> {
        Ok(())
    }
}

struct NoopJobFactory;

impl JobFactory for NoopJobFactory {
    fn new_job(&self, _detail: &JobDetail) -> Result<Arc<dyn Job>, JobExecutionError> {
        Ok(Arc::new(NoopJob))
    }
}

#[test]
fn test_set_job_factory_is_refused() {
    let f = fixture("reporting");

    let err = f
        .proxy
        .set_job_factory(Arc::new(NoopJobFactory))
        .unwrap_err();

    match err {
        SchedulerError::Unsupported(u) => assert_eq!(u.operation(), "set_job_factory"),
        other => panic!("expected unsupported operation, got {other:?}"),
    }
    assert!(!f.proxy.is_connected());
    assert_eq!(f.factory.connect_count(), 0);
}

#[test]
fn test_listener_manager_is_refused() {
    let f = fixture("reporting");

    let err = f.proxy.listener_manager().err().unwrap();

    assert!(matches!(err, SchedulerError::Unsupported(_)));
    assert!(!err.is_transient());
    assert_eq!(f.factory.connect_count(), 0);
    assert_eq!(f.engine.call_count(), 0);
}
