//! Control endpoint subsystem.
//!
//! # Data Flow
//! ```text
//! Backend node agent
//!     → GET /heartbeat → handlers.rs → Controller::report_heartbeat
//!     → GET /shutdown  → handlers.rs → Controller::report_shutdown
//! ```
//!
//! Bind failure is not fatal to the controller: it keeps running on the
//! timer alone and will time the backend out.

pub mod handlers;
pub mod server;

pub use server::{control_router, ControlServer, ListenerError};
