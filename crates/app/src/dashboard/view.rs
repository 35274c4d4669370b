//! Rendered dashboard: what every panel and chart shows after one render.

use serde::Serialize;

use infopanel_domain::color::{Color, Rgb};
use infopanel_domain::time::Timestamp;

use super::legend::LegendLabel;

/// Output of one render pass over a single snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub rendered_at: Timestamp,
    pub price: PricePanel,
    pub buses: Vec<StopView>,
    pub weather: WeatherPanel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePanel {
    /// Current price with two decimals, or a placeholder.
    pub current: String,
    pub chart: Option<BarChart>,
}

/// The electricity price bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub label: String,
    pub font_size: u32,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    /// `HH:MM` of the slot start, local time.
    pub label: String,
    /// `None` keeps the slot on the axis without a height.
    pub value: Option<f64>,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopView {
    pub name: String,
    /// Empty means the stop shows the "no departures" placeholder.
    pub departures: Vec<DepartureView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartureView {
    pub route: String,
    pub destination: String,
    /// Whole minutes until departure; negative once it has left.
    pub minutes: i64,
    /// `N min`, or `Now` for departures in the past.
    pub time_display: String,
    pub source: TimeSource,
}

/// Whether a departure time is tracked live or taken from the timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSource {
    Realtime,
    Scheduled,
}

impl TimeSource {
    /// CSS class of the time cell.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Realtime => "realtime",
            Self::Scheduled => "scheduled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherPanel {
    /// One decimal, or a placeholder.
    pub temperature: String,
    pub symbol: String,
    /// Whole percent, blank when there is no chance of rain.
    pub pop: String,
    pub forecast: Option<ForecastChart>,
}

/// Temperature line over rain bars, sharing the x axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastChart {
    pub font_size: u32,
    pub labels: Vec<String>,
    pub temperature: LineSeries,
    pub rain: BarSeries,
    /// Upper bound of the right-hand rain axis.
    pub rain_axis_max: f64,
    pub legend: Vec<LegendLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub label: String,
    /// `None` leaves a gap in the line.
    pub values: Vec<Option<f64>>,
    pub point_colors: Vec<Rgb>,
    /// Color of the segment ending at point `i + 1`.
    pub segment_colors: Vec<Rgb>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub label: String,
    pub values: Vec<f64>,
    pub colors: Vec<Color>,
}

impl ForecastChart {
    /// Range of the left-hand temperature axis, padded to whole degrees.
    #[must_use]
    pub fn temperature_range(&self) -> (f64, f64) {
        let values = self.temperature.values.iter().flatten().copied();
        let min = values.clone().fold(f64::INFINITY, f64::min);
        let max = values.fold(f64::NEG_INFINITY, f64::max);
        if !min.is_finite() || !max.is_finite() {
            return (0.0, 1.0);
        }
        let (low, high) = (min.floor() - 1.0, max.ceil() + 1.0);
        (low, high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_expose_css_class_per_time_source() {
        assert_eq!(TimeSource::Realtime.css_class(), "realtime");
        assert_eq!(TimeSource::Scheduled.css_class(), "scheduled");
    }

    #[test]
    fn should_pad_temperature_range_to_whole_degrees() {
        let chart = ForecastChart {
            font_size: 16,
            labels: vec![],
            temperature: LineSeries {
                label: String::new(),
                values: vec![Some(-1.4), None, Some(2.2), Some(0.5)],
                point_colors: vec![],
                segment_colors: vec![],
            },
            rain: BarSeries {
                label: String::new(),
                values: vec![],
                colors: vec![],
            },
            rain_axis_max: 1.0,
            legend: vec![],
        };
        assert_eq!(chart.temperature_range(), (-3.0, 4.0));
    }

    #[test]
    fn should_fall_back_to_unit_range_without_temperatures() {
        let chart = ForecastChart {
            font_size: 16,
            labels: vec![],
            temperature: LineSeries {
                label: String::new(),
                values: vec![None, None],
                point_colors: vec![],
                segment_colors: vec![],
            },
            rain: BarSeries {
                label: String::new(),
                values: vec![],
                colors: vec![],
            },
            rain_axis_max: 1.0,
            legend: vec![],
        };
        assert_eq!(chart.temperature_range(), (0.0, 1.0));
    }
}
