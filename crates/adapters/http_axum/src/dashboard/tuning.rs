//! Tuning form handlers. Each post applies the change and redirects back to
//! the dashboard.

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;

use infopanel_app::ports::StatusProvider;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GraphFontForm {
    /// Font size in pixels.
    pub size: i64,
}

#[derive(Debug, Deserialize)]
pub struct BusFontForm {
    /// Bus list scale in percent.
    pub percent: i64,
}

/// `POST /tuning/graph-font`
pub async fn graph_font<P>(
    State(state): State<AppState<P>>,
    Form(form): Form<GraphFontForm>,
) -> Result<Redirect, ApiError>
where
    P: StatusProvider + 'static,
{
    state.dashboard.set_graph_font_size(form.size).await?;
    Ok(Redirect::to("/"))
}

/// `POST /tuning/bus-font`
pub async fn bus_font<P>(
    State(state): State<AppState<P>>,
    Form(form): Form<BusFontForm>,
) -> Result<Redirect, ApiError>
where
    P: StatusProvider + 'static,
{
    state.dashboard.set_bus_font_scale(form.percent).await?;
    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::router::build;
    use crate::state::tests::test_state;

    fn post(uri: &str, body: &'static str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn should_not_route_tuning_when_disabled() {
        let app = build(test_state(false));
        let response = app
            .oneshot(post("/tuning/graph-font", "size=20"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_apply_graph_font_and_redirect() {
        let state = test_state(true);
        let app = build(state.clone());

        let response = app
            .oneshot(post("/tuning/graph-font", "size=22"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        assert_eq!(state.dashboard.tuning().await.graph_font_size, 22);
    }

    #[tokio::test]
    async fn should_apply_bus_font_scale_and_redirect() {
        let state = test_state(true);
        let app = build(state.clone());

        let response = app
            .oneshot(post("/tuning/bus-font", "percent=120"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let scale = state.dashboard.tuning().await.bus_font_scale;
        assert!((scale - 1.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn should_reject_out_of_range_values() {
        let state = test_state(true);
        let app = build(state.clone());

        let response = app
            .oneshot(post("/tuning/graph-font", "size=7"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.dashboard.tuning().await.graph_font_size, 16);
    }
}
