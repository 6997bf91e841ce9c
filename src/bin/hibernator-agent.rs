//! Reference backend node agent.
//!
//! Reports liveness to the controller's control endpoint on an interval. With a
//! command after `--`, the command is run as a child: heartbeats stop when it
//! exits, and `/shutdown` is reported only if it exited successfully. Without a
//! command, heartbeats run until Ctrl+C and `/shutdown` is reported on exit.

use std::time::Duration;

use clap::Parser;
use tokio::process::Command;
use tokio::time::{self, MissedTickBehavior};

use hibernator::agent::AgentClient;
use hibernator::lifecycle::shutdown_signal;
use hibernator::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "hibernator-agent")]
#[command(about = "Heartbeat agent for a hibernated backend server", long_about = None)]
struct Cli {
    /// Base URL of the controller's control endpoint.
    #[arg(long, default_value = "http://localhost:8080")]
    host: String,

    /// Seconds between heartbeats.
    #[arg(short, long, default_value_t = 10)]
    interval: u64,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    /// Command to run as the backend server.
    #[arg(last = true)]
    command: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging("info");

    let agent = AgentClient::new(&cli.host, Duration::from_secs(cli.timeout))?;
    let period = Duration::from_secs(cli.interval.max(1));

    let clean_exit = match cli.command.split_first() {
        Some((program, args)) => {
            let mut child = Command::new(program).args(args).spawn()?;
            tracing::info!(program = %program, pid = ?child.id(), "Backend server started");
            let status = heartbeat_until(&agent, period, child.wait()).await?;
            tracing::info!(%status, "Backend server exited");
            status.success()
        }
        None => {
            heartbeat_until(&agent, period, shutdown_signal()).await;
            true
        }
    };

    if clean_exit {
        if let Err(e) = agent.shutdown().await {
            tracing::error!(error = %e, "Failed to call proxy endpoint /shutdown");
        }
    } else {
        tracing::warn!("Backend server exited abnormally; not reporting shutdown");
    }
    Ok(())
}

/// Heartbeat every `period` until `done` resolves.
async fn heartbeat_until<F: std::future::Future>(agent: &AgentClient, period: Duration, done: F) -> F::Output {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(done);

    loop {
        tokio::select! {
            output = &mut done => return output,
            _ = ticker.tick() => {
                if let Err(e) = agent.heartbeat().await {
                    tracing::warn!(error = %e, "Failed to call proxy endpoint /heartbeat");
                }
            }
        }
    }
}
