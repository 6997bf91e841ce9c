//! Backend node hibernation subsystem.
//!
//! # Data Flow
//! ```text
//! Control endpoint (/heartbeat, /shutdown) ─┐
//! Timeout monitor (1 s tick) ───────────────┼─→ controller.rs (one guarded state object)
//! Connection gate (initial connect) ────────┘        │
//!                                                    ├─→ launcher (spawn backend)
//!                                                    └─→ ProxyHost (message / redirect
//!                                                        sessions in the holding area)
//! ```
//!
//! # Design Decisions
//! - Three entry points, one transition function
//! - The backend is never supervised; "crashed" and "hung" look the same
//! - Lockout is only left through an external health or shutdown report

pub mod controller;
pub mod gate;
pub mod monitor;
pub mod notice;
pub mod state;

pub use controller::{Controller, Snapshot, Timeouts};
pub use gate::{ConnectionAttempt, GateDecision};
pub use monitor::TimeoutMonitor;
pub use state::LifecycleState;
