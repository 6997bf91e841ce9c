//! Control endpoint server.
//!
//! # Responsibilities
//! - Create the Axum router for `/heartbeat` and `/shutdown`
//! - Bind the listener on the configured address
//! - Serve until the shutdown broadcast fires
//!
//! No authentication and no request bodies. Unknown paths get axum's default 404.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::hibernation::Controller;
use crate::http::handlers;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("invalid bind address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Build the control router around a controller.
pub fn control_router(controller: Arc<Controller>) -> Router {
    Router::new()
        .route("/heartbeat", get(handlers::heartbeat))
        .route("/shutdown", get(handlers::shutdown))
        .with_state(controller)
        .layer(TraceLayer::new_for_http())
}

/// HTTP listener receiving health and shutdown reports from the backend node.
pub struct ControlServer {
    router: Router,
}

impl ControlServer {
    pub fn new(controller: Arc<Controller>) -> Self {
        Self {
            router: control_router(controller),
        }
    }

    /// Bind the control listener.
    pub async fn bind(address: &str) -> Result<TcpListener, ListenerError> {
        let addr: SocketAddr = address.parse().map_err(|source| ListenerError::Address {
            address: address.to_string(),
            source,
        })?;

        TcpListener::bind(addr)
            .await
            .map_err(|source| ListenerError::Bind { address: addr, source })
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hibernation::{LifecycleState, Timeouts};
    use crate::launcher::{LaunchError, Launcher};
    use crate::proxy::MemoryProxy;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::time::Duration;
    use tower::ServiceExt;

    struct NoopLauncher;

    impl Launcher for NoopLauncher {
        fn launch(&self) -> Result<(), LaunchError> {
            Ok(())
        }
    }

    fn controller() -> Arc<Controller> {
        let timeouts = Timeouts {
            startup: Duration::from_secs(30),
            heartbeat: Duration::from_secs(15),
            crash_cooldown: Duration::from_secs(10),
        };
        Arc::new(Controller::new(timeouts, Arc::new(MemoryProxy::new()), Arc::new(NoopLauncher)))
    }

    async fn get(router: Router, path: &str) -> (StatusCode, usize) {
        let response = router
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        (status, body.len())
    }

    #[tokio::test]
    async fn heartbeat_returns_empty_ok_and_forces_up() {
        let controller = controller();
        let (status, len) = get(control_router(controller.clone()), "/heartbeat").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(len, 0);
        assert_eq!(controller.state(), LifecycleState::Up);
    }

    #[tokio::test]
    async fn shutdown_returns_ok_and_forces_down() {
        let controller = controller();
        controller.report_heartbeat();
        let (status, _) = get(control_router(controller.clone()), "/shutdown").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(controller.state(), LifecycleState::Down);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let controller = controller();
        let (status, _) = get(control_router(controller.clone()), "/status").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(controller.state(), LifecycleState::Down);
    }

    #[tokio::test]
    async fn bind_rejects_bad_address() {
        assert!(matches!(
            ControlServer::bind("not-an-address").await,
            Err(ListenerError::Address { .. })
        ));
    }
}
