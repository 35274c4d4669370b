//! `GET /api/status`: the current snapshot.

use axum::Json;
use axum::extract::State;

use infopanel_app::ports::StatusProvider;
use infopanel_domain::status::StatusSnapshot;

use crate::state::AppState;

/// Return the snapshot collected by the pollers.
pub async fn get<P>(State(state): State<AppState<P>>) -> Json<StatusSnapshot>
where
    P: StatusProvider + 'static,
{
    Json(state.store.snapshot())
}
