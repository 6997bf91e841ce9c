//! Process lifecycle management.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Settings → metrics → controller → timeout monitor → control endpoint
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → broadcast → monitor and control endpoint exit
//! ```
//!
//! The backend node is not stopped when the controller exits; it was never
//! supervised to begin with.

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
pub use startup::{start, Services};
