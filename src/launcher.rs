//! Backend node launcher.
//!
//! # Responsibilities
//! - Spawn the backend node with the configured argv and working directory
//! - Inherit standard I/O
//!
//! The child is never awaited or supervised. Whether it came up, hung or died
//! is observed only through heartbeats and their absence. A detached thread
//! reaps it on exit so no zombie is left behind.
//!
//! Launching needs no async runtime: the gate may call it from whatever thread
//! the routing layer's connection hook runs on.

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread;

use thiserror::Error;

use crate::config::Settings;
use crate::observability::metrics;

/// Error type for launch attempts.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("start command is empty")]
    EmptyCommand,

    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Starts the backend node. Implementations must return without waiting for it.
pub trait Launcher: Send + Sync {
    fn launch(&self) -> Result<(), LaunchError>;
}

/// Launches the backend node as a child process.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    argv: Vec<String>,
    directory: PathBuf,
}

impl ProcessLauncher {
    pub fn new(argv: Vec<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            argv,
            directory: directory.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let argv = settings.start_argv().into_iter().map(String::from).collect();
        Self::new(argv, &settings.start_directory)
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&self) -> Result<(), LaunchError> {
        let (program, args) = self.argv.split_first().ok_or(LaunchError::EmptyCommand)?;

        let child = Command::new(program)
            .args(args)
            .current_dir(&self.directory)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: program.clone(),
                source,
            })?;

        metrics::record_launch();
        tracing::info!(
            program = %program,
            directory = %self.directory.display(),
            pid = child.id(),
            "Backend node launched"
        );
        reap_in_background(child);
        Ok(())
    }
}

fn reap_in_background(mut child: Child) {
    let pid = child.id();
    let spawned = thread::Builder::new()
        .name(format!("reap-{pid}"))
        .spawn(move || match child.wait() {
            Ok(status) => tracing::debug!(pid = pid, status = %status, "Backend node process exited"),
            Err(e) => tracing::debug!(pid = pid, error = %e, "Failed to wait on backend node process"),
        });

    if let Err(e) = spawned {
        tracing::warn!(pid = pid, error = %e, "Could not start reaper thread for backend node");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_argv_is_rejected() {
        let launcher = ProcessLauncher::new(Vec::new(), ".");
        assert!(matches!(launcher.launch(), Err(LaunchError::EmptyCommand)));
    }

    #[test]
    fn missing_program_reports_spawn_error() {
        let launcher = ProcessLauncher::new(vec!["definitely-not-a-real-binary-4821".into()], ".");
        match launcher.launch() {
            Err(LaunchError::Spawn { program, .. }) => {
                assert_eq!(program, "definitely-not-a-real-binary-4821")
            }
            other => panic!("expected spawn error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn spawns_without_waiting() {
        let launcher = ProcessLauncher::new(vec!["sleep".into(), "5".into()], ".");
        let started = std::time::Instant::now();
        launcher.launch().unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[cfg(unix)]
    #[test]
    fn launches_from_a_thread_without_runtime() {
        let launcher = ProcessLauncher::new(vec!["true".into()], ".");
        let result = thread::spawn(move || launcher.launch().is_ok()).join();
        assert!(matches!(result, Ok(true)));
    }
}
