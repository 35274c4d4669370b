//! Server-side rendered HTML dashboard (no JavaScript).

pub mod home;
pub mod svg;
pub mod tuning;

use axum::Router;
use axum::routing::{get, post};

use infopanel_app::ports::StatusProvider;

use crate::state::AppState;

/// Build the dashboard sub-router.
///
/// The tuning form handlers only exist when `tuning_enabled` is set; otherwise
/// posting to them yields a plain 404.
pub fn routes<P>(tuning_enabled: bool) -> Router<AppState<P>>
where
    P: StatusProvider + 'static,
{
    let router = Router::new().route("/", get(home::index::<P>));
    if tuning_enabled {
        router
            .route("/tuning/graph-font", post(tuning::graph_font::<P>))
            .route("/tuning/bus-font", post(tuning::bus_font::<P>))
    } else {
        router
    }
}
