//! Configuration type definitions.

use serde::{Deserialize, Serialize};

/// Port used when the endpoint does not name one.
pub const DEFAULT_PORT: u16 = 1099;

/// Configuration of a remote scheduler proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Name of the remote scheduler. Used as the directory key and in errors.
    pub scheduler_name: String,
    /// Where the remote scheduler listens.
    pub endpoint: EndpointConfig,
}

/// Location of a remote scheduler endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Host name or address.
    pub host: String,
    /// Port number.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Name the engine is bound under at the endpoint. Defaults to the
    /// scheduler name.
    pub binding_name: Option<String>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl EndpointConfig {
    /// Create an endpoint on the default port.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            binding_name: None,
        }
    }

    /// Set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the binding name.
    pub fn with_binding_name(mut self, name: impl Into<String>) -> Self {
        self.binding_name = Some(name.into());
        self
    }

    /// Binding name, falling back to `scheduler_name`.
    pub fn binding<'a>(&'a self, scheduler_name: &'a str) -> &'a str {
        self.binding_name.as_deref().unwrap_or(scheduler_name)
    }

    /// Render as `host:port/binding`.
    pub fn address(&self, scheduler_name: &str) -> String {
        format!(
            "{}:{}/{}",
            self.host,
            self.port,
            self.binding(scheduler_name)
        )
    }
}

impl ProxyConfig {
    /// Create a configuration.
    pub fn new(scheduler_name: impl Into<String>, endpoint: EndpointConfig) -> Self {
        Self {
            scheduler_name: scheduler_name.into(),
            endpoint,
        }
    }

    /// Rendered endpoint address.
    pub fn address(&self) -> String {
        self.endpoint.address(&self.scheduler_name)
    }
}
