//! Connection gate.
//!
//! Consulted once per session, on its first hop into the proxy. Internal
//! transfers between nodes carry a previous node and are never intercepted.
//!
//! A hold or disconnect is carried out through [`ProxyHost`] while the
//! controller still holds its lock. The returned [`GateDecision`] tells the
//! routing layer what happened; only `Proceed` is left for it to act on.
//!
//! [`ProxyHost`]: crate::proxy::ProxyHost

use tokio::time::Instant;

use crate::hibernation::controller::{Controller, Event, Snapshot};
use crate::hibernation::notice;
use crate::hibernation::state::LifecycleState;
use crate::observability::metrics;
use crate::proxy::{NodeId, Notice, SessionId};

/// A session asking to be routed somewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionAttempt {
    pub session: SessionId,
    /// Node the session is coming from. `None` on the initial connection.
    pub previous_node: Option<NodeId>,
}

impl ConnectionAttempt {
    pub fn initial(session: SessionId) -> Self {
        Self {
            session,
            previous_node: None,
        }
    }

    pub fn transfer(session: SessionId, from: NodeId) -> Self {
        Self {
            session,
            previous_node: Some(from),
        }
    }
}

/// Outcome of gating a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Route normally. The routing layer sends the session where it asked to go.
    Proceed,
    /// `notice` was delivered and the session moved to the holding node.
    Hold { node: NodeId, notice: Notice },
    /// The session was terminated with `reason`.
    Disconnect { reason: Notice },
}

impl GateDecision {
    fn label(&self) -> &'static str {
        match self {
            GateDecision::Proceed => "proceed",
            GateDecision::Hold { .. } => "hold",
            GateDecision::Disconnect { .. } => "disconnect",
        }
    }
}

fn gate_notice(before: Snapshot) -> Option<Notice> {
    match before.state {
        LifecycleState::Up => None,
        LifecycleState::Down => Some(notice::launching(before.possible_issues)),
        LifecycleState::Starting => Some(notice::starting(before.possible_issues)),
        LifecycleState::Crashed => Some(notice::crashed()),
        LifecycleState::Lockout => Some(notice::lockout()),
    }
}

impl Controller {
    /// Gate a connecting session. May launch the backend node.
    pub fn admit(&self, attempt: &ConnectionAttempt) -> GateDecision {
        self.admit_at(attempt, Instant::now())
    }

    pub fn admit_at(&self, attempt: &ConnectionAttempt, now: Instant) -> GateDecision {
        if let Some(previous) = &attempt.previous_node {
            tracing::trace!(session = %attempt.session, from = %previous, "Internal transfer, not gated");
            return GateDecision::Proceed;
        }

        let (before, decision) = self.dispatch_with(Event::InitialConnect, now, |before| {
            let decision = match gate_notice(before) {
                Some(notice) => self.hold_or_disconnect(notice),
                None => GateDecision::Proceed,
            };
            self.deliver(attempt.session, &decision);
            (before, decision)
        });

        tracing::debug!(
            session = %attempt.session,
            state = %before.state,
            decision = decision.label(),
            "Initial connection gated"
        );
        metrics::record_gate_decision(decision.label());
        decision
    }

    /// Decision for a session that cannot reach the backend node: park it in
    /// the holding area if there is one, otherwise terminate it.
    pub fn hold_or_disconnect(&self, notice: Notice) -> GateDecision {
        match self.holding_node() {
            Some(node) => GateDecision::Hold {
                node: node.clone(),
                notice,
            },
            None => GateDecision::Disconnect { reason: notice },
        }
    }
}
