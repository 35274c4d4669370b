//! Pure rendering of a snapshot into a [`DashboardView`].
//!
//! Every call builds the whole view from scratch; there is no diffing
//! against a previous render. The four panels are independent of each other.

use chrono::{Duration, Local};

use infopanel_domain::color::ColorProfile;
use infopanel_domain::status::{
    Departure, ElectricityData, PriceSlot, StatusSnapshot, TransportData, WeatherData,
    WeatherPoint,
};
use infopanel_domain::time::{Timestamp, minutes_until};

use super::legend::{SeriesInfo, default_legend_labels, wrap_legend_generator};
use super::tuning::Tuning;
use super::view::{
    Bar, BarChart, BarSeries, DashboardView, DepartureView, ForecastChart, LineSeries,
    PricePanel, StopView, TimeSource, WeatherPanel,
};

pub const PLACEHOLDER: &str = "--";
pub const NOW_LABEL: &str = "Now";
pub const NO_DEPARTURES: &str = "No departures";

pub const PRICE_LABEL: &str = "Price (c/kWh)";
pub const TEMPERATURE_LABEL: &str = "Temperature (°C)";
pub const RAIN_LABEL: &str = "Rain (mm)";

/// How far ahead the price chart looks.
pub const PRICE_WINDOW_HOURS: i64 = 24;
/// 24 hours of 15-minute slots.
pub const MAX_PRICE_BARS: usize = 96;
pub const MAX_FORECAST_POINTS: usize = 24;

/// Render every panel of `snapshot` as seen at `now`.
#[must_use]
pub fn render(
    snapshot: &StatusSnapshot,
    tuning: &Tuning,
    profile: &ColorProfile,
    now: Timestamp,
) -> DashboardView {
    DashboardView {
        rendered_at: now,
        price: render_price(&snapshot.electricity, tuning, profile, now),
        buses: render_buses(&snapshot.transport, now),
        weather: render_weather(&snapshot.weather, tuning, profile, now),
    }
}

/// `HH:MM` in local time.
#[must_use]
pub fn hour_minute(at: Timestamp) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

/// Slots overlapping `[now, now + 24h)`, ascending by start, at most 96.
#[must_use]
pub fn price_window(prices: &[PriceSlot], now: Timestamp) -> Vec<&PriceSlot> {
    let window_end = now + Duration::hours(PRICE_WINDOW_HOURS);
    let mut slots: Vec<&PriceSlot> = prices
        .iter()
        .filter(|slot| slot.overlaps(now, window_end))
        .collect();
    slots.sort_by_key(|slot| slot.start_time);
    slots.truncate(MAX_PRICE_BARS);
    slots
}

#[must_use]
pub fn render_price(
    electricity: &ElectricityData,
    tuning: &Tuning,
    profile: &ColorProfile,
    now: Timestamp,
) -> PricePanel {
    let current = electricity
        .current_price
        .filter(|price| price.abs() > f64::EPSILON)
        .map_or_else(|| PLACEHOLDER.to_string(), |price| format!("{price:.2}"));

    let slots = price_window(&electricity.prices, now);
    let chart = (!slots.is_empty()).then(|| BarChart {
        label: PRICE_LABEL.to_string(),
        font_size: tuning.graph_font_size,
        bars: slots
            .into_iter()
            .map(|slot| Bar {
                label: hour_minute(slot.start_time),
                value: slot.price,
                color: profile.price_color(slot.price),
            })
            .collect(),
    });

    PricePanel { current, chart }
}

#[must_use]
pub fn departure_view(departure: &Departure, now: Timestamp) -> DepartureView {
    let minutes = minutes_until(departure.time, now);
    let time_display = if minutes < 0 {
        NOW_LABEL.to_string()
    } else {
        format!("{minutes} min")
    };
    DepartureView {
        route: departure.route_number.clone(),
        destination: departure.destination.clone(),
        minutes,
        time_display,
        source: if departure.realtime {
            TimeSource::Realtime
        } else {
            TimeSource::Scheduled
        },
    }
}

#[must_use]
pub fn render_buses(transport: &TransportData, now: Timestamp) -> Vec<StopView> {
    transport
        .stops
        .iter()
        .map(|stop| StopView {
            name: stop.stop_name.clone(),
            departures: stop
                .departures
                .iter()
                .map(|departure| departure_view(departure, now))
                .collect(),
        })
        .collect()
}

/// Points at or after `now`, ascending by time, at most 24.
#[must_use]
pub fn forecast_window(points: &[WeatherPoint], now: Timestamp) -> Vec<&WeatherPoint> {
    let mut upcoming: Vec<&WeatherPoint> = points.iter().filter(|p| p.time >= now).collect();
    upcoming.sort_by_key(|p| p.time);
    upcoming.truncate(MAX_FORECAST_POINTS);
    upcoming
}

#[must_use]
pub fn render_weather(
    weather: &WeatherData,
    tuning: &Tuning,
    profile: &ColorProfile,
    now: Timestamp,
) -> WeatherPanel {
    let (temperature, symbol, pop) = match &weather.current {
        Some(current) => (
            current
                .temperature
                .map_or_else(|| PLACEHOLDER.to_string(), |t| format!("{t:.1}")),
            current.symbol.clone(),
            if current.pop > 0.0 {
                format!("{:.0}%", current.pop)
            } else {
                String::new()
            },
        ),
        None => (PLACEHOLDER.to_string(), String::new(), String::new()),
    };

    WeatherPanel {
        temperature,
        symbol,
        pop,
        forecast: forecast_chart(&weather.forecast, tuning, profile, now),
    }
}

fn forecast_chart(
    forecast: &[WeatherPoint],
    tuning: &Tuning,
    profile: &ColorProfile,
    now: Timestamp,
) -> Option<ForecastChart> {
    let points = forecast_window(forecast, now);
    if points.is_empty() {
        return None;
    }

    let labels = points.iter().map(|p| hour_minute(p.time)).collect();
    let temps: Vec<Option<f64>> = points.iter().map(|p| p.temperature).collect();
    let rain: Vec<f64> = points
        .iter()
        .map(|p| p.precipitation.unwrap_or(0.0).max(0.0))
        .collect();

    let point_colors: Vec<_> = temps.iter().map(|t| profile.temp_color(*t)).collect();
    let segment_colors = point_colors.iter().skip(1).copied().collect();
    let rain_colors = rain.iter().map(|r| profile.rain_color(Some(*r))).collect();
    let rain_axis_max = rain.iter().copied().fold(1.0, f64::max);

    let generate_legend = wrap_legend_generator(default_legend_labels);
    let legend = generate_legend(&[
        SeriesInfo {
            label: TEMPERATURE_LABEL.to_string(),
            color: point_colors[0].into(),
        },
        SeriesInfo {
            label: RAIN_LABEL.to_string(),
            color: profile.rain_mid.into(),
        },
    ]);

    Some(ForecastChart {
        font_size: tuning.graph_font_size,
        labels,
        temperature: LineSeries {
            label: TEMPERATURE_LABEL.to_string(),
            values: temps,
            point_colors,
            segment_colors,
        },
        rain: BarSeries {
            label: RAIN_LABEL.to_string(),
            values: rain,
            colors: rain_colors,
        },
        rain_axis_max,
        legend,
    })
}
