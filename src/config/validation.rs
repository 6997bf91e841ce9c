//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (durations > 0, bind address parses)
//!
//! Returns all validation errors, not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::Settings;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("start_command is empty")]
    EmptyStartCommand,

    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("control endpoint address '{address}' is not a valid socket address")]
    InvalidBindAddress { address: String },
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.start_argv().is_empty() {
        errors.push(ValidationError::EmptyStartCommand);
    }

    let durations = [
        ("max_startup_time", settings.max_startup_time),
        ("max_heartbeat_interval", settings.max_heartbeat_interval),
        ("crash_cooldown_time", settings.crash_cooldown_time),
    ];
    for (field, secs) in durations {
        if secs == 0 {
            errors.push(ValidationError::ZeroDuration { field });
        }
    }

    let address = settings.control_address();
    if address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress { address });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
