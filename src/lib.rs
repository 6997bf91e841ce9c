//! On-demand lifecycle control for an expensive backend node.
//!
//! The controller keeps the backend stopped while idle, launches it when the
//! first client connects, watches its heartbeats, and tells the proxy where
//! each connecting session should go in the meantime.

pub mod agent;
pub mod config;
pub mod hibernation;
pub mod http;
pub mod launcher;
pub mod lifecycle;
pub mod observability;
pub mod proxy;

pub use config::Settings;
pub use hibernation::{ConnectionAttempt, Controller, GateDecision, LifecycleState};
pub use lifecycle::Shutdown;
pub use proxy::ProxyHost;
