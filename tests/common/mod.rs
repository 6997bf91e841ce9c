//! Shared utilities for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hibernator::config::{ObservabilityConfig, Settings};
use hibernator::launcher::{LaunchError, Launcher};
use hibernator::lifecycle::{self, Services, Shutdown};
use hibernator::proxy::MemoryProxy;

/// Launcher that only counts launch requests.
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    launches: AtomicUsize,
}

impl RecordingLauncher {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self) -> Result<(), LaunchError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Settings for the scenario timings: 30 s startup, 15 s heartbeat, 10 s cooldown.
pub fn settings(port: u16) -> Settings {
    Settings {
        start_directory: ".".into(),
        start_command: "./start.sh".into(),
        max_startup_time: 30,
        max_heartbeat_interval: 15,
        crash_cooldown_time: 10,
        http_server_host: "127.0.0.1".into(),
        http_server_port: port,
        target_server_name: Some("survival".into()),
        limbo_server_name: Some("limbo".into()),
        observability: ObservabilityConfig::default(),
    }
}

pub fn proxy() -> Arc<MemoryProxy> {
    Arc::new(MemoryProxy::with_nodes(["survival", "limbo"]))
}

/// Start the full service stack on an ephemeral control port.
#[allow(dead_code)]
pub async fn start_services(
    proxy: Arc<MemoryProxy>,
    launcher: Arc<RecordingLauncher>,
    shutdown: &Shutdown,
) -> Services {
    let services = lifecycle::start(&settings(0), proxy, launcher, shutdown).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    services
}
