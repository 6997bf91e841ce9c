//! Client side of the control protocol.
//!
//! Used by the backend node's agent to report liveness and clean shutdown.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("request to {path} failed: {source}")]
    Request {
        path: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status code from {path}: {status}")]
    Status {
        path: &'static str,
        status: reqwest::StatusCode,
    },
}

/// HTTP client for a controller's control endpoint.
#[derive(Debug, Clone)]
pub struct AgentClient {
    base_url: String,
    client: reqwest::Client,
}

impl AgentClient {
    /// `base_url` is the controller's control endpoint, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).no_proxy().build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub async fn heartbeat(&self) -> Result<(), AgentError> {
        self.call("/heartbeat").await
    }

    pub async fn shutdown(&self) -> Result<(), AgentError> {
        self.call("/shutdown").await
    }

    async fn call(&self, path: &'static str) -> Result<(), AgentError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .map_err(|source| AgentError::Request { path, source })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(AgentError::Status { path, status });
        }
        Ok(())
    }
}
