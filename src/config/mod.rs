//! Configuration loading and parsing.
//!
//! This module provides YAML-based configuration for remote scheduler proxies.

mod error;
mod types;
mod yaml;

pub use error::ConfigError;
pub use types::{DEFAULT_PORT, EndpointConfig, ProxyConfig};
pub use yaml::YamlLoader;
