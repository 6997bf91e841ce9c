//! Control endpoint over real TCP.

use std::sync::Arc;
use std::time::Duration;

use hibernator::lifecycle::{self, Shutdown};
use hibernator::proxy::NodeId;
use hibernator::{ConnectionAttempt, LifecycleState};

mod common;

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn heartbeat_brings_waiting_sessions_to_the_destination() {
    let proxy = common::proxy();
    let launcher = Arc::new(common::RecordingLauncher::default());
    let shutdown = Shutdown::new();
    let services = common::start_services(proxy.clone(), launcher.clone(), &shutdown).await;
    let addr = services.control_address.expect("control endpoint bound");
    let controller = services.controller.clone();

    let session = proxy.open_session();
    let decision = controller.admit(&ConnectionAttempt::initial(session));
    proxy.route(session, &NodeId::new("survival"), &decision);
    assert_eq!(proxy.node_of(session), Some(NodeId::new("limbo")));
    assert_eq!(controller.state(), LifecycleState::Starting);
    assert_eq!(launcher.launches(), 1);

    let res = client().get(format!("http://{addr}/heartbeat")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.text().await.unwrap().is_empty());

    assert_eq!(controller.state(), LifecycleState::Up);
    assert_eq!(proxy.node_of(session), Some(NodeId::new("survival")));

    let res = client().get(format!("http://{addr}/shutdown")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(controller.state(), LifecycleState::Down);

    let res = client().get(format!("http://{addr}/nope")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), services.join()).await.unwrap();
}

#[tokio::test]
async fn bind_failure_leaves_controller_running() {
    let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = occupied.local_addr().unwrap().port();

    let shutdown = Shutdown::new();
    let launcher = Arc::new(common::RecordingLauncher::default());
    let services = lifecycle::start(&common::settings(port), common::proxy(), launcher.clone(), &shutdown).await;

    assert!(services.control_address.is_none());
    let controller = services.controller.clone();
    controller.admit(&ConnectionAttempt::initial(hibernator::proxy::SessionId::new(1)));
    assert_eq!(controller.state(), LifecycleState::Starting);
    assert_eq!(launcher.launches(), 1);

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), services.join()).await.unwrap();
}
