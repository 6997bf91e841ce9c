//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → Settings (validated, immutable)
//!     → shared by reference with the controller and control endpoint
//! ```
//!
//! # Design Decisions
//! - Settings are loaded once at startup and never reloaded
//! - A missing or malformed file is fatal; there is no retry
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{ObservabilityConfig, Settings};
pub use validation::ValidationError;
