//! Dashboard page: clock, electricity price, bus departures and weather.

use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use infopanel_app::dashboard::render::{NO_DEPARTURES, PLACEHOLDER, hour_minute};
use infopanel_app::dashboard::tuning::{BUS_SCALE_PERCENT_RANGE, GRAPH_FONT_RANGE};
use infopanel_app::dashboard::view::StopView;
use infopanel_app::dashboard::{ClockReading, DashboardView, Tuning};
use infopanel_app::ports::StatusProvider;

use super::svg::{BarChartSvg, ForecastChartSvg};
use crate::state::AppState;

/// Slider settings of the tuning panel.
#[derive(Debug)]
pub struct TuningPanel {
    graph_font_size: u32,
    graph_min: i64,
    graph_max: i64,
    bus_scale_percent: u32,
    bus_min: i64,
    bus_max: i64,
}

impl TuningPanel {
    fn new(tuning: &Tuning) -> Self {
        Self {
            graph_font_size: tuning.graph_font_size,
            graph_min: *GRAPH_FONT_RANGE.start(),
            graph_max: *GRAPH_FONT_RANGE.end(),
            bus_scale_percent: tuning.bus_font_scale_percent(),
            bus_min: *BUS_SCALE_PERCENT_RANGE.start(),
            bus_max: *BUS_SCALE_PERCENT_RANGE.end(),
        }
    }
}

/// Dashboard page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    refresh_seconds: u64,
    clock: ClockReading,
    updated: String,
    current_price: String,
    price_chart: Option<BarChartSvg>,
    stops: Vec<StopView>,
    no_departures: &'static str,
    temperature: String,
    symbol: String,
    pop: String,
    forecast_chart: Option<ForecastChartSvg>,
    bus_style: String,
    tuning: Option<TuningPanel>,
}

impl DashboardTemplate {
    /// Build the page from the last view; `None` shows placeholders everywhere.
    #[must_use]
    pub fn new(
        view: Option<&DashboardView>,
        tuning: &Tuning,
        tuning_enabled: bool,
        clock: ClockReading,
        refresh_seconds: u64,
    ) -> Self {
        let mut page = Self {
            refresh_seconds,
            clock,
            updated: PLACEHOLDER.to_string(),
            current_price: PLACEHOLDER.to_string(),
            price_chart: None,
            stops: Vec::new(),
            no_departures: NO_DEPARTURES,
            temperature: PLACEHOLDER.to_string(),
            symbol: String::new(),
            pop: String::new(),
            forecast_chart: None,
            bus_style: tuning.bus_font_style(),
            tuning: tuning_enabled.then(|| TuningPanel::new(tuning)),
        };
        if let Some(view) = view {
            page.updated = hour_minute(view.rendered_at);
            page.current_price.clone_from(&view.price.current);
            page.price_chart = view.price.chart.as_ref().map(BarChartSvg::new);
            page.stops.clone_from(&view.buses);
            page.temperature.clone_from(&view.weather.temperature);
            page.symbol.clone_from(&view.weather.symbol);
            page.pop.clone_from(&view.weather.pop);
            page.forecast_chart = view.weather.forecast.as_ref().map(ForecastChartSvg::new);
        }
        page
    }
}

impl IntoResponse for DashboardTemplate {
    fn into_response(self) -> Response {
        match self.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "failed to render dashboard page");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// `GET /`: the dashboard.
pub async fn index<P>(State(state): State<AppState<P>>) -> DashboardTemplate
where
    P: StatusProvider + 'static,
{
    let view = state.dashboard.view();
    let tuning = state.dashboard.tuning().await;
    DashboardTemplate::new(
        view.as_deref(),
        &tuning,
        state.dashboard.tuning_enabled(),
        state.clock.latest(),
        state.page_refresh_secs,
    )
}
