//! `GET /api/dashboard`: the last rendered view.

use axum::Json;
use axum::extract::State;

use infopanel_app::dashboard::DashboardView;
use infopanel_app::ports::StatusProvider;

use crate::state::AppState;

/// `null` until the first successful refresh.
pub async fn get<P>(State(state): State<AppState<P>>) -> Json<Option<DashboardView>>
where
    P: StatusProvider + 'static,
{
    Json(state.dashboard.view().map(|view| (*view).clone()))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use infopanel_domain::status::ElectricityData;

    use crate::router::build;
    use crate::state::tests::test_state;

    async fn fetch(app: axum::Router) -> serde_json::Value {
        let response = app
            .oneshot(Request::get("/api/dashboard").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        serde_json::from_slice(&response.into_body().collect().await.unwrap().to_bytes()).unwrap()
    }

    #[tokio::test]
    async fn should_return_null_before_first_refresh() {
        let state = test_state(false);
        assert!(fetch(build(state)).await.is_null());
    }

    #[tokio::test]
    async fn should_return_rendered_view_after_refresh() {
        let state = test_state(false);
        state.store.update_electricity(ElectricityData {
            current_price: Some(15.0),
            ..ElectricityData::default()
        });
        state.dashboard.refresh().await.unwrap();

        let body = fetch(build(state)).await;

        assert_eq!(body["price"]["current"], "15.00");
        assert!(body["price"]["chart"].is_null());
        assert!(body["weather"]["forecast"].is_null());
    }
}
