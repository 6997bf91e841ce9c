//! Startup orchestration.
//!
//! # Order
//! 1. Metrics exporter (if configured)
//! 2. Controller, with node names resolved against the proxy
//! 3. Timeout monitor
//! 4. Control endpoint (bind failure is logged; the controller keeps running)

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::config::Settings;
use crate::hibernation::{Controller, TimeoutMonitor};
use crate::http::ControlServer;
use crate::launcher::Launcher;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::proxy::ProxyHost;

/// Running background services.
pub struct Services {
    pub controller: Arc<Controller>,
    /// Address the control endpoint is bound to, if the bind succeeded.
    pub control_address: Option<SocketAddr>,
    tasks: Vec<JoinHandle<()>>,
}

impl Services {
    /// Wait for every background task to exit after shutdown was triggered.
    pub async fn join(self) {
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Background task failed");
            }
        }
    }
}

/// Start the controller, timeout monitor and control endpoint.
pub async fn start(
    settings: &Settings,
    host: Arc<dyn ProxyHost>,
    launcher: Arc<dyn Launcher>,
    shutdown: &Shutdown,
) -> Services {
    if let Some(address) = &settings.observability.metrics_address {
        match address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(metrics_address = %address, "Failed to parse metrics address"),
        }
    }

    let controller = Arc::new(Controller::from_settings(settings, host, launcher));
    tracing::info!(
        target_node = ?controller.target_node().map(|n| n.as_str()),
        holding_node = ?controller.holding_node().map(|n| n.as_str()),
        startup_timeout_secs = settings.max_startup_time,
        heartbeat_timeout_secs = settings.max_heartbeat_interval,
        crash_cooldown_secs = settings.crash_cooldown_time,
        "Controller initialized"
    );

    let mut tasks = Vec::new();

    let monitor = TimeoutMonitor::new(controller.clone());
    tasks.push(tokio::spawn(monitor.run(shutdown.subscribe())));

    let address = settings.control_address();
    let mut control_address = None;
    match ControlServer::bind(&address).await {
        Ok(listener) => {
            control_address = listener.local_addr().ok();
            let server = ControlServer::new(controller.clone());
            let server_shutdown = shutdown.subscribe();
            tasks.push(tokio::spawn(async move {
                if let Err(e) = server.run(listener, server_shutdown).await {
                    tracing::error!(error = %e, "HTTP server failed");
                }
            }));
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                "Failed to start HTTP server; health and shutdown reports will not be received"
            );
        }
    }

    Services {
        controller,
        control_address,
        tasks,
    }
}
