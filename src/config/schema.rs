//! Configuration schema definitions.
//!
//! Keys mirror the on-disk TOML file one to one. Durations are stored as whole
//! seconds and exposed as [`Duration`] through accessor methods.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the hibernation controller.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Working directory the backend node is launched in.
    pub start_directory: String,

    /// Space-delimited command line used to launch the backend node.
    pub start_command: String,

    /// Seconds the backend node may spend in `Starting` before lockout.
    pub max_startup_time: u64,

    /// Seconds of heartbeat silence after which an `Up` node is presumed crashed.
    pub max_heartbeat_interval: u64,

    /// Seconds to wait in `Crashed` before the controller resets to `Down`.
    pub crash_cooldown_time: u64,

    /// Host the control endpoint binds to.
    #[serde(default = "default_http_host")]
    pub http_server_host: String,

    /// Port the control endpoint binds to.
    pub http_server_port: u16,

    /// Node sessions are redirected to once the backend reports healthy.
    #[serde(default)]
    pub target_server_name: Option<String>,

    /// Node sessions are parked on while the backend is unavailable.
    #[serde(default)]
    pub limbo_server_name: Option<String>,

    /// Logging and metrics settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

impl Settings {
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.max_startup_time)
    }

    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_secs(self.max_heartbeat_interval)
    }

    pub fn crash_cooldown(&self) -> Duration {
        Duration::from_secs(self.crash_cooldown_time)
    }

    /// Destination node name, with an empty string treated as unset.
    pub fn target_server(&self) -> Option<&str> {
        non_empty(self.target_server_name.as_deref())
    }

    /// Holding-area node name, with an empty string treated as unset.
    pub fn limbo_server(&self) -> Option<&str> {
        non_empty(self.limbo_server_name.as_deref())
    }

    /// Launch command split on spaces, skipping repeated separators.
    pub fn start_argv(&self) -> Vec<&str> {
        self.start_command.split(' ').filter(|s| !s.is_empty()).collect()
    }

    /// `host:port` the control endpoint binds to.
    pub fn control_address(&self) -> String {
        format!("{}:{}", self.http_server_host, self.http_server_port)
    }
}

fn non_empty(name: Option<&str>) -> Option<&str> {
    name.map(str::trim).filter(|s| !s.is_empty())
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Prometheus exporter bind address. No exporter is installed when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_address: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        start_directory = "/srv/game"
        start_command = "java  -Xmx4G -jar server.jar"
        max_startup_time = 120
        max_heartbeat_interval = 30
        crash_cooldown_time = 10
        http_server_port = 8080
    "#;

    #[test]
    fn minimal_config_uses_defaults() {
        let settings: Settings = toml::from_str(MINIMAL).unwrap();
        assert_eq!(settings.http_server_host, "0.0.0.0");
        assert_eq!(settings.observability.log_level, "info");
        assert!(settings.observability.metrics_address.is_none());
        assert!(settings.target_server().is_none());
        assert!(settings.limbo_server().is_none());
        assert_eq!(settings.startup_timeout(), Duration::from_secs(120));
        assert_eq!(settings.control_address(), "0.0.0.0:8080");
    }

    #[test]
    fn start_command_splits_on_spaces() {
        let settings: Settings = toml::from_str(MINIMAL).unwrap();
        assert_eq!(settings.start_argv(), vec!["java", "-Xmx4G", "-jar", "server.jar"]);
    }

    #[test]
    fn empty_node_names_are_unset() {
        let text = format!("{MINIMAL}\ntarget_server_name = \"\"\nlimbo_server_name = \"limbo\"\n");
        let settings: Settings = toml::from_str(&text).unwrap();
        assert!(settings.target_server().is_none());
        assert_eq!(settings.limbo_server(), Some("limbo"));
    }

    #[test]
    fn missing_required_key_is_rejected() {
        let text = MINIMAL.replace("max_startup_time = 120", "");
        assert!(toml::from_str::<Settings>(&text).is_err());
    }
}
