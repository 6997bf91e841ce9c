//! Control endpoint handlers.
//!
//! Both routes always answer `200` with an empty body; the report is fed to
//! the controller as a side effect.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode};

use crate::hibernation::Controller;

pub async fn heartbeat(State(controller): State<Arc<Controller>>) -> StatusCode {
    tracing::trace!("Heartbeat received");
    controller.report_heartbeat();
    StatusCode::OK
}

pub async fn shutdown(State(controller): State<Arc<Controller>>) -> StatusCode {
    controller.report_shutdown();
    StatusCode::OK
}
