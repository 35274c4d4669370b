//! Inline SVG charts.
//!
//! Geometry is computed here from the view model; the askama templates only
//! place the precomputed shapes. Every render builds new charts from scratch.

use askama::Template;

use infopanel_app::dashboard::legend::{LegendLabel, PointStyle};
use infopanel_app::dashboard::render::PLACEHOLDER;
use infopanel_app::dashboard::view::{BarChart, ForecastChart};

pub const WIDTH: f64 = 640.0;
pub const HEIGHT: f64 = 260.0;

const LEFT: f64 = 48.0;
const RIGHT_AXIS: f64 = 44.0;
const MAX_X_LABELS: usize = 8;
const TICKS: usize = 5;
/// Height of the marker drawn for a slot without a price.
const MISSING_BAR: f64 = 2.0;

/// One decimal is plenty for pixel coordinates.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Vertical extent of the plot area for a given tick font size.
fn plot_bounds(font_size: u32, with_legend: bool) -> (f64, f64) {
    let font = f64::from(font_size);
    let top = if with_legend { font * 2.0 + 8.0 } else { 10.0 };
    let bottom = HEIGHT - font - 10.0;
    (top, bottom)
}

/// Linear map of `[low, high]` onto `[bottom, top]`.
#[derive(Debug, Clone, Copy)]
struct Scale {
    low: f64,
    high: f64,
    top: f64,
    bottom: f64,
}

impl Scale {
    fn new(low: f64, high: f64, top: f64, bottom: f64) -> Self {
        let high = if high - low < f64::EPSILON { low + 1.0 } else { high };
        Self {
            low,
            high,
            top,
            bottom,
        }
    }

    fn y(&self, value: f64) -> f64 {
        let ratio = (value - self.low) / (self.high - self.low);
        self.bottom - ratio * (self.bottom - self.top)
    }

    #[allow(clippy::cast_precision_loss)]
    fn ticks(&self) -> Vec<f64> {
        let step = (self.high - self.low) / (TICKS - 1) as f64;
        (0..TICKS).map(|i| self.low + step * i as f64).collect()
    }
}

fn tick_text(value: f64, span: f64) -> String {
    if span >= 5.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    pub cx: f64,
    pub cy: f64,
    pub fill: String,
}

/// A legend entry with its marker.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub is_line: bool,
    /// Corner radius of box markers.
    pub rx: f64,
    pub fill: String,
    pub stroke: String,
}

impl LegendItem {
    fn new(label: &LegendLabel, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            text: label.text.clone(),
            is_line: label.point_style == PointStyle::Line,
            rx: if label.point_style == PointStyle::RectRounded {
                3.0
            } else {
                0.0
            },
            fill: label.fill_style.to_string(),
            stroke: label.stroke_style.to_string(),
        }
    }
}

/// x labels to show: every `step`-th slot center.
#[allow(clippy::cast_precision_loss)]
fn x_labels(labels: &[String], slot: f64, baseline: f64) -> Vec<Text> {
    let step = labels.len().div_ceil(MAX_X_LABELS).max(1);
    labels
        .iter()
        .enumerate()
        .filter(|(index, _)| index % step == 0)
        .map(|(index, text)| Text {
            x: round1(LEFT + slot * (index as f64 + 0.5)),
            y: round1(baseline),
            text: text.clone(),
        })
        .collect()
}

fn y_ticks(scale: &Scale, x: f64) -> Vec<Text> {
    let span = scale.high - scale.low;
    scale
        .ticks()
        .into_iter()
        .map(|value| Text {
            x,
            y: round1(scale.y(value) + 4.0),
            text: tick_text(value, span),
        })
        .collect()
}

/// The electricity price bar chart.
#[derive(Debug, Template)]
#[template(path = "bar_chart.svg", escape = "html")]
pub struct BarChartSvg {
    width: f64,
    height: f64,
    font_size: u32,
    label: String,
    zero_y: f64,
    plot_left: f64,
    plot_right: f64,
    bars: Vec<Rect>,
    x_labels: Vec<Text>,
    y_ticks: Vec<Text>,
}

impl BarChartSvg {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(chart: &BarChart) -> Self {
        let (top, bottom) = plot_bounds(chart.font_size, false);
        let right = WIDTH - 8.0;
        let values = chart.bars.iter().filter_map(|bar| bar.value);
        let low = values.clone().fold(0.0, f64::min);
        let high = values.fold(0.0, f64::max);
        let scale = Scale::new(low, high, top, bottom);

        let slot = (right - LEFT) / chart.bars.len().max(1) as f64;
        let zero_y = scale.y(0.0);
        let bars = chart
            .bars
            .iter()
            .enumerate()
            .map(|(index, bar)| {
                let (y, height, title) = match bar.value {
                    Some(value) => {
                        let value_y = scale.y(value);
                        (
                            value_y.min(zero_y),
                            (value_y - zero_y).abs(),
                            format!("{} {value:.2}", bar.label),
                        )
                    }
                    None => (
                        zero_y - MISSING_BAR,
                        MISSING_BAR,
                        format!("{} {PLACEHOLDER}", bar.label),
                    ),
                };
                Rect {
                    x: round1(LEFT + slot * index as f64 + slot * 0.1),
                    y: round1(y),
                    width: round1(slot * 0.8),
                    height: round1(height),
                    fill: bar.color.to_string(),
                    title,
                }
            })
            .collect();
        let labels: Vec<String> = chart.bars.iter().map(|bar| bar.label.clone()).collect();

        Self {
            width: WIDTH,
            height: HEIGHT,
            font_size: chart.font_size,
            label: chart.label.clone(),
            zero_y: round1(zero_y),
            plot_left: LEFT,
            plot_right: right,
            bars,
            x_labels: x_labels(&labels, slot, HEIGHT - 6.0),
            y_ticks: y_ticks(&scale, LEFT - 6.0),
        }
    }
}

/// Temperature line over rain bars with two y axes.
#[derive(Debug, Template)]
#[template(path = "forecast_chart.svg", escape = "html")]
pub struct ForecastChartSvg {
    width: f64,
    height: f64,
    font_size: u32,
    label: String,
    rain_bars: Vec<Rect>,
    segments: Vec<Segment>,
    dots: Vec<Dot>,
    x_labels: Vec<Text>,
    temperature_ticks: Vec<Text>,
    rain_ticks: Vec<Text>,
    legend: Vec<LegendItem>,
}

impl ForecastChartSvg {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(chart: &ForecastChart) -> Self {
        let (top, bottom) = plot_bounds(chart.font_size, true);
        let right = WIDTH - RIGHT_AXIS;
        let (low, high) = chart.temperature_range();
        let temperature = Scale::new(low, high, top, bottom);
        let rain = Scale::new(0.0, chart.rain_axis_max, top, bottom);

        let count = chart.labels.len().max(1);
        let slot = (right - LEFT) / count as f64;
        let center = |index: usize| LEFT + slot * (index as f64 + 0.5);

        let rain_bars = chart
            .rain
            .values
            .iter()
            .zip(&chart.rain.colors)
            .enumerate()
            .map(|(index, (amount, color))| {
                let y = rain.y(*amount);
                Rect {
                    x: round1(center(index) - slot * 0.3),
                    y: round1(y),
                    width: round1(slot * 0.6),
                    height: round1(bottom - y),
                    fill: color.to_string(),
                    title: format!(
                        "{} {amount:.1} mm",
                        chart.labels.get(index).map_or("", String::as_str)
                    ),
                }
            })
            .collect();

        let values = &chart.temperature.values;
        // A missing reading breaks the line on both sides.
        let segments = values
            .windows(2)
            .zip(&chart.temperature.segment_colors)
            .enumerate()
            .filter_map(|(index, (pair, color))| {
                let (start, end) = (pair[0]?, pair[1]?);
                Some(Segment {
                    x1: round1(center(index)),
                    y1: round1(temperature.y(start)),
                    x2: round1(center(index + 1)),
                    y2: round1(temperature.y(end)),
                    stroke: color.to_string(),
                })
            })
            .collect();
        let dots = values
            .iter()
            .zip(&chart.temperature.point_colors)
            .enumerate()
            .filter_map(|(index, (value, color))| {
                value.map(|value| Dot {
                    cx: round1(center(index)),
                    cy: round1(temperature.y(value)),
                    fill: color.to_string(),
                })
            })
            .collect();

        let legend_y = f64::from(chart.font_size) + 2.0;
        let legend = chart
            .legend
            .iter()
            .enumerate()
            .map(|(index, label)| LegendItem::new(label, LEFT + 200.0 * index as f64, legend_y))
            .collect();

        Self {
            width: WIDTH,
            height: HEIGHT,
            font_size: chart.font_size,
            label: format!("{} / {}", chart.temperature.label, chart.rain.label),
            rain_bars,
            segments,
            dots,
            x_labels: x_labels(&chart.labels, slot, HEIGHT - 6.0),
            temperature_ticks: y_ticks(&temperature, LEFT - 6.0),
            rain_ticks: y_ticks(&rain, right + 6.0),
            legend,
        }
    }
}
