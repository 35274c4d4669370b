//! Clock endpoints: latest reading and a Server-Sent Events stream.

use std::convert::Infallible;

use axum::Json;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;

use infopanel_app::dashboard::ClockReading;
use infopanel_app::ports::StatusProvider;

use crate::state::AppState;

/// `GET /api/clock`: the latest reading.
pub async fn latest<P>(State(state): State<AppState<P>>) -> Json<ClockReading>
where
    P: StatusProvider + 'static,
{
    Json(state.clock.latest())
}

/// `GET /api/clock/stream`: one `data:` frame per clock tick.
///
/// The current reading is sent immediately, then every change. The stream
/// ends when the client disconnects.
pub async fn stream<P>(
    State(state): State<AppState<P>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>
where
    P: StatusProvider + 'static,
{
    let readings = WatchStream::new(state.clock.subscribe()).filter_map(|reading| {
        match serde_json::to_string(&reading) {
            Ok(json) => Some(Ok(Event::default().event("clock").data(json))),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize clock reading for SSE stream");
                None
            }
        }
    });

    Sse::new(readings).keep_alive(KeepAlive::default())
}
