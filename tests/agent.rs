//! Agent client against a live control endpoint.

use std::sync::Arc;
use std::time::Duration;

use hibernator::agent::{AgentClient, AgentError};
use hibernator::lifecycle::Shutdown;
use hibernator::LifecycleState;

mod common;

#[tokio::test]
async fn agent_reports_heartbeat_and_shutdown() {
    let shutdown = Shutdown::new();
    let launcher = Arc::new(common::RecordingLauncher::default());
    let services = common::start_services(common::proxy(), launcher.clone(), &shutdown).await;
    let addr = services.control_address.unwrap();
    let controller = services.controller.clone();

    let agent = AgentClient::new(format!("http://{addr}/"), Duration::from_secs(2)).unwrap();

    agent.heartbeat().await.unwrap();
    assert_eq!(controller.state(), LifecycleState::Up);

    agent.shutdown().await.unwrap();
    assert_eq!(controller.state(), LifecycleState::Down);
    assert_eq!(launcher.launches(), 0);

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), services.join()).await.unwrap();
}

#[tokio::test]
async fn agent_reports_unreachable_controller() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let agent = AgentClient::new(format!("http://{addr}"), Duration::from_secs(1)).unwrap();
    assert!(matches!(agent.heartbeat().await, Err(AgentError::Request { path: "/heartbeat", .. })));
}
