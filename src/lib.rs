pub mod config;
pub mod core;
pub mod directory;
pub mod proxy;
pub mod remote;
pub mod scheduler;
pub mod testing;

pub use config::{ConfigError, EndpointConfig, ProxyConfig, YamlLoader};
pub use core::calendar::Calendar;
pub use core::job::{JobDataMap, JobDetail, JobError};
pub use core::matcher::GroupMatcher;
pub use core::metadata::{ExecutingJob, SchedulerContext, SchedulerMetaData};
pub use core::schedule::{ScheduleError, TriggerSchedule};
pub use core::trigger::{MisfireInstruction, Trigger, TriggerError, TriggerState};
pub use core::types::{JobKey, TriggerKey};
pub use core::wrapper::{InternalTriggerState, TriggerWrapper};
pub use directory::{DirectoryError, InMemoryDirectory, SchedulerDirectory};
pub use proxy::RemoteSchedulerProxy;
pub use remote::{
    ConnectionError, ConnectionFailure, ConnectionHandle, DomainError, EndpointFactory,
    FnFactory, RemoteError, RemoteResult, RemoteScheduler, TransportError,
};
pub use scheduler::{
    CommunicationError, InterruptFailure, InterruptTarget, Scheduler, SchedulerError,
    UnableToInterruptError, UnsupportedOperation,
};
