//! Diagnostics endpoints under `/api/debug`.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use infopanel_app::ports::StatusProvider;
use infopanel_domain::diagnostics::{ApiCallLog, DeviceInfo, LogEntry};
use infopanel_domain::status::StatusSnapshot;

use crate::state::AppState;

/// Body of `GET /api/debug/status`.
#[derive(Serialize)]
pub struct DebugStatus {
    /// Configuration with secrets masked.
    pub config: serde_json::Value,
    pub store: StatusSnapshot,
}

/// `GET /api/debug/status`: configuration and snapshot side by side.
pub async fn status<P>(State(state): State<AppState<P>>) -> Json<DebugStatus>
where
    P: StatusProvider + 'static,
{
    Json(DebugStatus {
        config: (*state.debug_config).clone(),
        store: state.store.snapshot(),
    })
}

/// `GET /api/debug/timeline`: the last upstream calls, oldest first.
pub async fn timeline<P>(State(state): State<AppState<P>>) -> Json<Vec<ApiCallLog>>
where
    P: StatusProvider + 'static,
{
    Json(state.store.debug_data().api_calls)
}

/// `GET /api/debug/logs`: the last captured log lines, oldest first.
pub async fn logs<P>(State(state): State<AppState<P>>) -> Json<Vec<LogEntry>>
where
    P: StatusProvider + 'static,
{
    Json(state.store.debug_data().app_logs)
}

/// `GET /api/debug/device`
pub async fn device<P>(State(state): State<AppState<P>>) -> Json<DeviceInfo>
where
    P: StatusProvider + 'static,
{
    Json(state.store.debug_data().device)
}
