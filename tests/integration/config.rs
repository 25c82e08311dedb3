//! Building a proxy from YAML configuration.

use petit_remote::remote::ConnectionFailure;
use petit_remote::testing::FakeEngine;
use petit_remote::{
    EndpointConfig, InMemoryDirectory, RemoteScheduler, RemoteSchedulerProxy, Scheduler,
    SchedulerDirectory, SchedulerError, YamlLoader,
};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

const CONFIG: &str = r#"
scheduler_name: reporting
endpoint:
  host: sched.internal
  port: 2099
  binding_name: reporting-engine
"#;

#[tokio::test]
async fn test_proxy_from_yaml_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{CONFIG}").unwrap();
    let config = YamlLoader::load_proxy_config(file.path()).unwrap();

    let engine = FakeEngine::new("reporting");
    let dialed: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let connect = {
        let engine = engine.clone();
        let dialed = dialed.clone();
        move |endpoint: &EndpointConfig| -> Result<Arc<dyn RemoteScheduler>, ConnectionFailure> {
            dialed
                .lock()
                .unwrap()
                .push(format!("{}:{}", endpoint.host, endpoint.port));
            Ok(engine.clone() as Arc<dyn RemoteScheduler>)
        }
    };
    let directory = Arc::new(InMemoryDirectory::new());
    let proxy = Arc::new(RemoteSchedulerProxy::from_config(
        &config,
        connect,
        directory.clone(),
    ));
    proxy.register().unwrap();

    assert_eq!(proxy.scheduler_id(), "reporting");
    assert!(dialed.lock().unwrap().is_empty());

    proxy.start().await.unwrap();
    assert_eq!(*dialed.lock().unwrap(), vec!["sched.internal:2099"]);
    assert_eq!(directory.names().unwrap(), vec!["reporting"]);
}

#[tokio::test]
async fn test_connection_error_names_configured_address() {
    let config = YamlLoader::parse_proxy_config(CONFIG).unwrap();
    let proxy = RemoteSchedulerProxy::from_config(
        &config,
        |_: &EndpointConfig| Err(ConnectionFailure::Lookup("reporting-engine".into())),
        Arc::new(InMemoryDirectory::new()),
    );

    let err = proxy.scheduler_name().await.unwrap_err();

    match err {
        SchedulerError::Connection(c) => {
            assert_eq!(c.endpoint(), "sched.internal:2099/reporting-engine");
        }
        other => panic!("expected connection error, got {other:?}"),
    }
}
