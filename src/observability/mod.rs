//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Controller, gate, launcher, control endpoint
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;
