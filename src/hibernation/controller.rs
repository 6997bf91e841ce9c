//! Lifecycle controller.
//!
//! # Responsibilities
//! - Own the lifecycle state and its timestamps
//! - Decide every transition, whichever entry point requested it
//! - Message and redirect sessions waiting in the holding area
//! - Hold or disconnect gated sessions before the lock is released, so a
//!   concurrent health report always sees them
//! - Launch the backend node on demand
//!
//! # Design Decisions
//! - State, timestamps and the possible-issues flag sit behind one mutex; each
//!   read-decide-write sequence, side effects included, runs under it
//! - Side effects are non-blocking (enqueue a message, spawn a process), so the
//!   lock is never held across I/O waits
//! - The heartbeat, timer and gate entry points all go through [`Controller::dispatch`]

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::config::Settings;
use crate::hibernation::gate::GateDecision;
use crate::hibernation::notice;
use crate::hibernation::state::{LifecycleState, Phase};
use crate::launcher::Launcher;
use crate::observability::metrics;
use crate::proxy::{NodeId, Notice, ProxyHost, SessionId};

/// Time limits applied by the timeout checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub startup: Duration,
    pub heartbeat: Duration,
    pub crash_cooldown: Duration,
}

impl Timeouts {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            startup: settings.startup_timeout(),
            heartbeat: settings.heartbeat_timeout(),
            crash_cooldown: settings.crash_cooldown(),
        }
    }
}

/// Point-in-time view of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub state: LifecycleState,
    /// Set after a startup timed out, cleared by the next health report.
    pub possible_issues: bool,
}

/// Inputs that can drive a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Event {
    Heartbeat,
    ShutdownReported,
    Tick,
    InitialConnect,
}

#[derive(Debug)]
struct Inner {
    phase: Phase,
    possible_issues: bool,
}

impl Inner {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.phase.state(),
            possible_issues: self.possible_issues,
        }
    }
}

/// The authoritative owner of the backend node's lifecycle.
pub struct Controller {
    host: Arc<dyn ProxyHost>,
    launcher: Arc<dyn Launcher>,
    timeouts: Timeouts,
    target: Option<NodeId>,
    holding: Option<NodeId>,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<LifecycleState>,
}

impl Controller {
    /// Create a controller in `Down` with no destination or holding node.
    pub fn new(timeouts: Timeouts, host: Arc<dyn ProxyHost>, launcher: Arc<dyn Launcher>) -> Self {
        let (state_tx, _) = watch::channel(LifecycleState::Down);
        Self {
            host,
            launcher,
            timeouts,
            target: None,
            holding: None,
            inner: Mutex::new(Inner {
                phase: Phase::Down,
                possible_issues: false,
            }),
            state_tx,
        }
    }

    /// Create a controller from settings, resolving node names against `host`.
    ///
    /// A configured name the host does not know is treated as unconfigured.
    pub fn from_settings(
        settings: &Settings,
        host: Arc<dyn ProxyHost>,
        launcher: Arc<dyn Launcher>,
    ) -> Self {
        let target = resolve_node(host.as_ref(), "target", settings.target_server());
        let holding = resolve_node(host.as_ref(), "limbo", settings.limbo_server());

        let mut controller = Self::new(Timeouts::from_settings(settings), host, launcher);
        controller.target = target;
        controller.holding = holding;
        controller
    }

    pub fn with_target(mut self, node: NodeId) -> Self {
        self.target = Some(node);
        self
    }

    pub fn with_holding_area(mut self, node: NodeId) -> Self {
        self.holding = Some(node);
        self
    }

    pub fn target_node(&self) -> Option<&NodeId> {
        self.target.as_ref()
    }

    pub fn holding_node(&self) -> Option<&NodeId> {
        self.holding.as_ref()
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    pub fn state(&self) -> LifecycleState {
        self.lock().phase.state()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    /// Watch channel updated on every state change.
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state_tx.subscribe()
    }

    /// Health report from the backend node.
    pub fn report_heartbeat(&self) {
        self.report_heartbeat_at(Instant::now());
    }

    pub fn report_heartbeat_at(&self, now: Instant) {
        self.dispatch(Event::Heartbeat, now);
    }

    /// Clean-exit report from the backend node. Always resets to `Down`.
    pub fn report_shutdown(&self) {
        self.report_shutdown_at(Instant::now());
    }

    pub fn report_shutdown_at(&self, now: Instant) {
        self.dispatch(Event::ShutdownReported, now);
    }

    /// Evaluate the time-based condition of the current state.
    pub fn tick(&self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&self, now: Instant) {
        self.dispatch(Event::Tick, now);
    }

    /// Apply `event` in a single critical section.
    ///
    /// Returns the snapshot taken before the event was applied.
    pub(crate) fn dispatch(&self, event: Event, now: Instant) -> Snapshot {
        self.dispatch_with(event, now, |before| before)
    }

    /// Like [`Controller::dispatch`], but first runs `decide` on the snapshot
    /// taken before the event, inside the same critical section.
    pub(crate) fn dispatch_with<R>(
        &self,
        event: Event,
        now: Instant,
        decide: impl FnOnce(Snapshot) -> R,
    ) -> R {
        let mut inner = self.lock();
        let decided = decide(inner.snapshot());

        match event {
            Event::Heartbeat => self.on_heartbeat(&mut inner, now),
            Event::ShutdownReported => {
                tracing::info!("Backend node reported shutdown");
                self.set_phase(&mut inner, Phase::Down);
            }
            Event::Tick => self.on_tick(&mut inner, now),
            Event::InitialConnect => {
                if inner.phase == Phase::Down {
                    self.start(&mut inner, now);
                }
            }
        }

        decided
    }

    /// Carry out a gate decision through the routing layer.
    pub(crate) fn deliver(&self, session: SessionId, decision: &GateDecision) {
        match decision {
            GateDecision::Proceed => {}
            GateDecision::Hold { node, notice } => {
                self.host.notify(session, notice);
                self.host.redirect(session, node);
            }
            GateDecision::Disconnect { reason } => self.host.disconnect(session, reason),
        }
    }

    fn on_heartbeat(&self, inner: &mut Inner, now: Instant) {
        metrics::record_heartbeat();

        if let Phase::Up { .. } = inner.phase {
            inner.phase = Phase::Up { last_heartbeat: now };
            return;
        }

        self.set_phase(inner, Phase::Up { last_heartbeat: now });
        inner.possible_issues = false;

        if let (Some(target), Some(holding)) = (&self.target, &self.holding) {
            let ready = notice::ready();
            for session in self.host.sessions_on(holding) {
                self.host.notify(session, &ready);
                self.host.redirect(session, target);
            }
        }
    }

    fn on_tick(&self, inner: &mut Inner, now: Instant) {
        match inner.phase {
            Phase::Starting { since } if now.saturating_duration_since(since) > self.timeouts.startup => {
                tracing::warn!(
                    timeout_secs = self.timeouts.startup.as_secs(),
                    "Backend node did not come up within required timeframe"
                );
                inner.possible_issues = true;
                self.set_phase(inner, Phase::Lockout);
                self.broadcast(&notice::startup_timed_out());
            }
            Phase::Up { last_heartbeat } if now.saturating_duration_since(last_heartbeat) > self.timeouts.heartbeat => {
                tracing::warn!(
                    timeout_secs = self.timeouts.heartbeat.as_secs(),
                    "Backend node timed out"
                );
                self.set_phase(inner, Phase::Crashed { since: now });
                self.broadcast(&notice::crashed());
            }
            Phase::Crashed { since } if now.saturating_duration_since(since) > self.timeouts.crash_cooldown => {
                tracing::info!("Crash cooldown time elapsed");
                self.set_phase(inner, Phase::Down);

                let waiting = self.waiting_sessions();
                if !waiting.is_empty() {
                    self.start(inner, now);
                    let restarting = notice::restarting();
                    for session in waiting {
                        self.host.notify(session, &restarting);
                    }
                }
            }
            _ => {}
        }
    }

    fn start(&self, inner: &mut Inner, now: Instant) {
        self.set_phase(inner, Phase::Starting { since: now });

        if let Err(e) = self.launcher.launch() {
            tracing::error!(error = %e, "Failed to run start command");
        }
    }

    fn set_phase(&self, inner: &mut Inner, phase: Phase) {
        let from = inner.phase.state();
        let to = phase.state();
        inner.phase = phase;

        tracing::info!(from = %from, to = %to, "State changed! {} -> {}", from, to);
        metrics::record_transition(from, to);
        self.state_tx.send_replace(to);
    }

    fn broadcast(&self, notice: &Notice) {
        for session in self.waiting_sessions() {
            self.host.notify(session, notice);
        }
    }

    fn waiting_sessions(&self) -> Vec<SessionId> {
        match &self.holding {
            Some(node) => self.host.sessions_on(node),
            None => Vec::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("timeouts", &self.timeouts)
            .field("target", &self.target)
            .field("holding", &self.holding)
            .field("inner", &self.lock())
            .finish()
    }
}

fn resolve_node(host: &dyn ProxyHost, role: &str, name: Option<&str>) -> Option<NodeId> {
    let node = NodeId::new(name?);
    if host.has_node(&node) {
        Some(node)
    } else {
        tracing::warn!(role = role, node = %node, "Configured node is not registered with the proxy; ignoring");
        None
    }
}
