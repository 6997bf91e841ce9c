//! Configuration loading from disk.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::Settings;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading. Every variant is fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {} is missing", .0.display())]
    Missing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigError::Missing(path.to_path_buf()),
        _ => ConfigError::Io(e),
    })?;
    let settings: Settings = toml::from_str(&content)?;

    validate_config(&settings).map_err(ConfigError::Validation)?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_full_config() {
        let file = write_config(
            r#"
            start_directory = "/srv/game"
            start_command = "./run.sh"
            max_startup_time = 90
            max_heartbeat_interval = 20
            crash_cooldown_time = 5
            http_server_port = 8085
            target_server_name = "survival"
            limbo_server_name = "limbo"

            [observability]
            log_level = "debug"
            metrics_address = "127.0.0.1:9100"
            "#,
        );

        let settings = load_config(file.path()).unwrap();
        assert_eq!(settings.target_server(), Some("survival"));
        assert_eq!(settings.limbo_server(), Some("limbo"));
        assert_eq!(settings.observability.log_level, "debug");
        assert_eq!(settings.observability.metrics_address.as_deref(), Some("127.0.0.1:9100"));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(p) if p == path));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let file = write_config("start_directory = [unterminated");
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn semantic_errors_fail_the_load() {
        let file = write_config(
            r#"
            start_directory = "."
            start_command = ""
            max_startup_time = 0
            max_heartbeat_interval = 20
            crash_cooldown_time = 5
            http_server_port = 8085
            "#,
        );

        match load_config(file.path()) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }
}
