//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from the TOML config
//! file. Every section has defaults so a minimal config can omit it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings (bind address, drain grace).
    pub server: ServerConfig,

    /// Coordination store connection and watch settings.
    pub store: StoreConfig,

    /// Orchestrator callback registration settings.
    pub orchestrator: OrchestratorConfig,

    /// Local hook commands run on state changes.
    pub hooks: HooksConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Seconds in-flight requests get to finish once draining starts.
    pub drain_grace_secs: u64,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn drain_grace(&self) -> Duration {
        Duration::from_secs(self.drain_grace_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            drain_grace_secs: 10,
            request_timeout_secs: 30,
        }
    }
}

/// Coordination store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Cluster endpoints (e.g., ["http://127.0.0.1:2379"]).
    pub endpoints: Vec<String>,

    /// Root path the service definitions live under.
    pub root_path: String,

    /// Watch the whole subtree below `root_path`, not just the node itself.
    pub recursive: bool,

    /// Bound on the initial connection attempt; exceeding it is fatal.
    pub connect_timeout_secs: u64,

    /// Pause before re-arming the watch after a stream failure.
    pub reconnect_delay_secs: u64,
}

impl StoreConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoints: vec!["http://127.0.0.1:2379".to_string()],
            root_path: "/trellis/services".to_string(),
            recursive: true,
            connect_timeout_secs: 10,
            reconnect_delay_secs: 2,
        }
    }
}

/// Orchestrator callback registration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Orchestrator API endpoints to register the callback with.
    /// Registering with every node of the same cluster is safe.
    pub endpoints: Vec<String>,

    /// Publicly reachable URL of this process, used as the callback target.
    pub callback_url: String,
}

/// Local hook commands.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HooksConfig {
    /// Shell command forked on every service change (e.g., a proxy reload).
    /// The child is not waited on; the reaper collects its exit status.
    pub reload_command: Option<String>,
}
