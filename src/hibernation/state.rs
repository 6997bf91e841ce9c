//! Lifecycle states.
//!
//! # State Transitions
//! ```text
//! Down     → Starting: initial client connection
//! Starting → Up:       health report
//! Starting → Lockout:  no health report within max_startup_time
//! Up       → Crashed:  no health report within max_heartbeat_interval
//! Crashed  → Down:     crash cooldown elapsed (→ Starting again if sessions wait)
//! any      → Up:       health report
//! any      → Down:     shutdown report
//! ```

use std::fmt;

use tokio::time::Instant;

/// Publicly observable lifecycle state of the backend node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Down,
    Starting,
    Up,
    Crashed,
    Lockout,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Down => "DOWN",
            LifecycleState::Starting => "STARTING",
            LifecycleState::Up => "UP",
            LifecycleState::Crashed => "CRASHED",
            LifecycleState::Lockout => "LOCKOUT",
        }
    }

    /// Stable numeric code, used for the state gauge.
    pub fn code(&self) -> u8 {
        match self {
            LifecycleState::Down => 0,
            LifecycleState::Starting => 1,
            LifecycleState::Up => 2,
            LifecycleState::Crashed => 3,
            LifecycleState::Lockout => 4,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Internal state. Each timestamp lives only inside the state that defines it,
/// so it cannot be consulted in any other state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Down,
    Starting { since: Instant },
    Up { last_heartbeat: Instant },
    Crashed { since: Instant },
    Lockout,
}

impl Phase {
    pub(crate) fn state(&self) -> LifecycleState {
        match self {
            Phase::Down => LifecycleState::Down,
            Phase::Starting { .. } => LifecycleState::Starting,
            Phase::Up { .. } => LifecycleState::Up,
            Phase::Crashed { .. } => LifecycleState::Crashed,
            Phase::Lockout => LifecycleState::Lockout,
        }
    }
}
