//! Domain model shared by the proxy and the remote engine.
//!
//! Everything here is plain data that crosses the remote boundary.

pub mod calendar;
pub mod job;
pub mod matcher;
pub mod metadata;
pub mod schedule;
pub mod trigger;
pub mod types;
pub mod wrapper;
