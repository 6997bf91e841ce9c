//! Timeout monitor.
//!
//! Ticks the controller on a fixed period for the life of the process so the
//! startup timeout, heartbeat timeout and crash cooldown are evaluated.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::hibernation::Controller;

/// Period between timeout checks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct TimeoutMonitor {
    controller: Arc<Controller>,
    period: Duration,
}

impl TimeoutMonitor {
    pub fn new(controller: Arc<Controller>) -> Self {
        Self {
            controller,
            period: TICK_PERIOD,
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(period_ms = self.period.as_millis() as u64, "Timeout monitor starting");

        let mut ticker = time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.controller.tick();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Timeout monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hibernation::{ConnectionAttempt, LifecycleState, Timeouts};
    use crate::launcher::{LaunchError, Launcher};
    use crate::lifecycle::Shutdown;
    use crate::proxy::{MemoryProxy, SessionId};

    struct NoopLauncher;

    impl Launcher for NoopLauncher {
        fn launch(&self) -> Result<(), LaunchError> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn startup_timeout_fires_from_the_timer() {
        let timeouts = Timeouts {
            startup: Duration::from_secs(5),
            heartbeat: Duration::from_secs(5),
            crash_cooldown: Duration::from_secs(5),
        };
        let controller = Arc::new(Controller::new(timeouts, Arc::new(MemoryProxy::new()), Arc::new(NoopLauncher)));
        controller.admit(&ConnectionAttempt::initial(SessionId::new(1)));

        let shutdown = Shutdown::new();
        let handle = tokio::spawn(TimeoutMonitor::new(controller.clone()).run(shutdown.subscribe()));

        time::sleep(Duration::from_millis(4500)).await;
        assert_eq!(controller.state(), LifecycleState::Starting);

        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(controller.state(), LifecycleState::Lockout);

        shutdown.trigger();
        handle.await.unwrap();
    }
}
