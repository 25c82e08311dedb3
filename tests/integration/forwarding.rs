//! Forwarding integration tests.
//!
//! Each scheduler call reaches the engine with its arguments intact and the
//! engine's answer comes back unchanged.

use crate::common::{durable_job, fixture, minutely};
use chrono::{TimeZone, Utc};
use petit_remote::remote::DomainError;
use petit_remote::{
    Calendar, GroupMatcher, JobDetail, JobKey, Scheduler, SchedulerError, Trigger, TriggerKey,
    TriggerSchedule, TriggerState,
};
use std::time::Duration;

#[tokio::test]
async fn test_schedule_job_returns_first_fire_time() {
    let f = fixture("reporting");
    let start = Utc.with_ymd_and_hms(2030, 1, 1, 9, 0, 0).unwrap();
    let trigger = Trigger::builder("hourly", "report")
        .start_at(start)
        .schedule(TriggerSchedule::every(Duration::from_secs(3600)))
        .build()
        .unwrap();
    let job = JobDetail::builder("report", "reports.Generate")
        .build()
        .unwrap();

    let first = f.proxy.schedule_job(job, trigger).await.unwrap();
    assert_eq!(first, start);

    let triggers = f.proxy.triggers_of_job(&"report".into()).await.unwrap();
    assert_eq!(triggers.len(), 1);
    assert_eq!(triggers[0].key(), &TriggerKey::new("hourly"));
}

#[tokio::test]
async fn test_cron_trigger_first_fire_time() {
    let f = fixture("reporting");
    let start = Utc.with_ymd_and_hms(2030, 1, 1, 0, 30, 0).unwrap();
    let trigger = Trigger::builder("nightly", "report")
        .start_at(start)
        .schedule(TriggerSchedule::cron("0 2 * * *").unwrap())
        .build()
        .unwrap();
    f.proxy.add_job(durable_job("report"), false).await.unwrap();

    let first = f.proxy.schedule_trigger(trigger).await.unwrap();
    assert_eq!(first, Utc.with_ymd_and_hms(2030, 1, 1, 2, 0, 0).unwrap());
}

#[tokio::test]
async fn test_queries_by_group() {
    let f = fixture("reporting");
    let etl = JobKey::with_group("extract", "etl");
    f.proxy
        .add_job(
            JobDetail::builder(etl.clone(), "etl.Extract")
                .durable(true)
                .build()
                .unwrap(),
            false,
        )
        .await
        .unwrap();
    f.proxy.add_job(durable_job("report"), false).await.unwrap();

    assert_eq!(
        f.proxy.job_group_names().await.unwrap(),
        vec!["DEFAULT", "etl"]
    );
    let keys = f.proxy.job_keys(&GroupMatcher::group("etl")).await.unwrap();
    assert_eq!(keys.len(), 1);
    assert!(keys.contains(&etl));

    assert!(f.proxy.check_job_exists(&etl).await.unwrap());
    let detail = f.proxy.job_detail(&etl).await.unwrap().unwrap();
    assert_eq!(detail.job_type(), "etl.Extract");
    assert!(f.proxy.job_detail(&"nope".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_pause_and_resume_trigger() {
    let f = fixture("reporting");
    f.proxy
        .schedule_job(
            JobDetail::builder("report", "reports.Generate").build().unwrap(),
            minutely("every-minute", "report"),
        )
        .await
        .unwrap();
    let key = TriggerKey::new("every-minute");

    f.proxy.pause_trigger(&key).await.unwrap();
    assert_eq!(f.proxy.trigger_state(&key).await.unwrap(), TriggerState::Paused);

    f.proxy.resume_job(&"report".into()).await.unwrap();
    assert_eq!(f.proxy.trigger_state(&key).await.unwrap(), TriggerState::Normal);

    f.proxy
        .pause_triggers(&GroupMatcher::group("DEFAULT"))
        .await
        .unwrap();
    assert!(
        f.proxy
            .paused_trigger_groups()
            .await
            .unwrap()
            .contains("DEFAULT")
    );
    f.proxy.resume_all().await.unwrap();
    assert!(f.proxy.paused_trigger_groups().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reschedule_and_unschedule() {
    let f = fixture("reporting");
    f.proxy.add_job(durable_job("report"), false).await.unwrap();
    f.proxy
        .schedule_trigger(minutely("t1", "report"))
        .await
        .unwrap();

    let replaced = f
        .proxy
        .reschedule_job(&"t1".into(), minutely("t2", "report"))
        .await
        .unwrap();
    assert!(replaced.is_some());
    assert!(!f.proxy.check_trigger_exists(&"t1".into()).await.unwrap());
    assert!(f.proxy.check_trigger_exists(&"t2".into()).await.unwrap());

    let missing = f
        .proxy
        .reschedule_job(&"t1".into(), minutely("t3", "report"))
        .await
        .unwrap();
    assert!(missing.is_none());

    assert!(f.proxy.unschedule_job(&"t2".into()).await.unwrap());
    // Durable jobs survive losing their last trigger.
    assert!(f.proxy.check_job_exists(&"report".into()).await.unwrap());
}

#[tokio::test]
async fn test_add_job_requires_durability() {
    let f = fixture("reporting");
    let job = JobDetail::builder("adhoc", "reports.Generate")
        .build()
        .unwrap();

    let err = f.proxy.add_job(job.clone(), false).await.unwrap_err();
    assert!(matches!(
        err,
        SchedulerError::Domain(DomainError::InvalidArgument(_))
    ));

    f.proxy.add_non_durable_job(job, false).await.unwrap();
    assert!(f.proxy.check_job_exists(&"adhoc".into()).await.unwrap());
}

#[tokio::test]
async fn test_calendars() {
    let f = fixture("reporting");
    let calendar = Calendar::new().with_description("Public holidays");
    f.proxy
        .add_calendar("holidays", calendar.clone(), false, false)
        .await
        .unwrap();

    let err = f
        .proxy
        .add_calendar("holidays", calendar.clone(), false, false)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SchedulerError::Domain(DomainError::ObjectAlreadyExists(_))
    ));

    assert_eq!(f.proxy.calendar_names().await.unwrap(), vec!["holidays"]);
    assert_eq!(
        f.proxy.calendar("holidays").await.unwrap(),
        Some(calendar)
    );
    assert!(f.proxy.delete_calendar("holidays").await.unwrap());
}

#[tokio::test]
async fn test_lifecycle_and_metadata() {
    let f = fixture("reporting");
    assert!(!f.proxy.is_started().await.unwrap());
    assert!(f.proxy.is_in_standby_mode().await.unwrap());

    f.proxy.start().await.unwrap();
    assert!(f.proxy.is_started().await.unwrap());

    let metadata = f.proxy.metadata().await.unwrap();
    assert_eq!(metadata.scheduler_name, "reporting");
    assert!(metadata.is_started());
    assert!(!metadata.in_standby_mode);
    assert_eq!(
        f.proxy.scheduler_instance_id().await.unwrap(),
        metadata.instance_id
    );
}

#[tokio::test]
async fn test_schedule_jobs_and_clear() {
    let f = fixture("reporting");
    f.proxy
        .schedule_jobs(
            vec![
                (durable_job("a"), vec![minutely("a1", "a")]),
                (durable_job("b"), vec![minutely("b1", "b"), minutely("b2", "b")]),
            ],
            false,
        )
        .await
        .unwrap();
    assert_eq!(
        f.proxy
            .trigger_keys(&GroupMatcher::AnyGroup)
            .await
            .unwrap()
            .len(),
        3
    );

    assert!(
        f.proxy
            .delete_jobs(&[JobKey::new("a"), JobKey::new("b")])
            .await
            .unwrap()
    );
    f.proxy
        .schedule_job_with_triggers(durable_job("c"), vec![minutely("c1", "c")], false)
        .await
        .unwrap();
    f.proxy.clear().await.unwrap();
    assert!(f.proxy.job_group_names().await.unwrap().is_empty());
    assert!(f.proxy.trigger_group_names().await.unwrap().is_empty());
}
