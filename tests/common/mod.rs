//! Common test utilities shared across integration tests.

use petit_remote::testing::{CountingFactory, FakeEngine, RecordingDirectory};
use petit_remote::{JobDetail, RemoteSchedulerProxy, Trigger, TriggerSchedule};
use std::sync::Arc;
use std::time::Duration;

/// A proxy wired to a fake engine, with handles on every collaborator.
pub struct Fixture {
    pub engine: Arc<FakeEngine>,
    pub factory: Arc<CountingFactory>,
    pub directory: Arc<RecordingDirectory>,
    pub proxy: Arc<RemoteSchedulerProxy>,
}

/// Build a proxy named `name` and register it in a fresh directory.
pub fn fixture(name: &str) -> Fixture {
    let engine = FakeEngine::new(name);
    let factory = CountingFactory::new(engine.clone());
    let directory = RecordingDirectory::new();
    let proxy = Arc::new(RemoteSchedulerProxy::new(
        name,
        factory.clone(),
        directory.clone(),
    ));
    proxy.register().unwrap();
    Fixture {
        engine,
        factory,
        directory,
        proxy,
    }
}

/// A job that stays stored without triggers.
pub fn durable_job(name: &str) -> JobDetail {
    JobDetail::builder(name, "reports.Generate")
        .durable(true)
        .build()
        .unwrap()
}

/// A trigger that fires every minute.
pub fn minutely(name: &str, job: &str) -> Trigger {
    Trigger::builder(name, job)
        .schedule(TriggerSchedule::every(Duration::from_secs(60)))
        .build()
        .unwrap()
}
