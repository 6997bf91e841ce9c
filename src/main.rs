//! Hibernation controller.
//!
//! # Architecture Overview
//!
//! ```text
//!   Backend node agent                         Proxy (routing layer)
//!   ──────────────────                         ─────────────────────
//!   GET /heartbeat ──┐                         initial connect
//!   GET /shutdown ───┤                               │
//!                    ▼                               ▼
//!            ┌──────────────┐   transitions   ┌────────────┐
//!            │ control http │───────────────▶ │ controller │ ◀── gate
//!            └──────────────┘                 └─────┬──────┘
//!            ┌──────────────┐   1 s tick            │
//!            │   monitor    │───────────────────────┤
//!            └──────────────┘                       ├──▶ launcher (spawn backend)
//!                                                   └──▶ holding-area messages
//! ```
//!
//! # Standalone mode
//!
//! This binary has no client-facing listener. It runs the controller against
//! an in-memory routing layer that never receives sessions, so nothing calls
//! [`Controller::admit`] and it never launches the backend node on its own.
//! It consumes `/heartbeat` and `/shutdown` reports and runs the timeout
//! checks. On-demand launching needs a proxy that embeds the library,
//! implements [`ProxyHost`] and gates each initial connection through
//! `Controller::admit`.
//!
//! [`Controller::admit`]: hibernator::Controller::admit
//! [`ProxyHost`]: hibernator::ProxyHost

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use hibernator::config::load_config;
use hibernator::launcher::ProcessLauncher;
use hibernator::lifecycle::{self, shutdown_signal, Shutdown};
use hibernator::observability::logging::init_logging;
use hibernator::proxy::MemoryProxy;

#[derive(Parser)]
#[command(name = "hibernator")]
#[command(
    about = "Tracks a backend server's health from its heartbeat and shutdown reports",
    long_about = "Tracks a backend server's health from its heartbeat and shutdown reports.\n\n\
        Standalone, no client sessions reach the controller, so the backend is never \
        launched on demand. That requires a proxy embedding the hibernator library and \
        calling Controller::admit for each initial connection."
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let settings = match load_config(&cli.config) {
        Ok(settings) => settings,
        Err(e) => {
            init_logging("info");
            tracing::error!(error = %e, "Initialization failed: could not read config");
            return Err(e.into());
        }
    };
    init_logging(&settings.observability.log_level);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "hibernator starting");

    let proxy = Arc::new(MemoryProxy::with_nodes(
        [settings.target_server(), settings.limbo_server()]
            .into_iter()
            .flatten()
            .map(String::from),
    ));
    let launcher = Arc::new(ProcessLauncher::from_settings(&settings));

    let shutdown = Shutdown::new();
    let services = lifecycle::start(&settings, proxy, launcher, &shutdown).await;

    shutdown_signal().await;
    shutdown.trigger();
    services.join().await;

    tracing::info!("Shutdown complete");
    Ok(())
}
