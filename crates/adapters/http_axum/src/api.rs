//! JSON API handler modules.

pub mod debug;
pub mod sse;
pub mod status;
pub mod view;

use axum::Router;
use axum::routing::get;

use infopanel_app::ports::StatusProvider;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<P>() -> Router<AppState<P>>
where
    P: StatusProvider + 'static,
{
    Router::new()
        .route("/status", get(status::get::<P>))
        // Diagnostics
        .route("/debug/status", get(debug::status::<P>))
        .route("/debug/timeline", get(debug::timeline::<P>))
        .route("/debug/logs", get(debug::logs::<P>))
        .route("/debug/device", get(debug::device::<P>))
        // Dashboard
        .route("/dashboard", get(view::get::<P>))
        .route("/clock", get(sse::latest::<P>))
        .route("/clock/stream", get(sse::stream::<P>))
}
