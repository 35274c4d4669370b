//! Legend label generation for the forecast chart.
//!
//! A base generator produces one label per series; [`wrap_legend_generator`]
//! decorates any generator so the temperature entry is drawn as a line and
//! the rain entry as a rounded box, both in neutral gray.

use serde::Serialize;

use infopanel_domain::color::{Color, Rgb};

/// Neutral gray used for restyled legend markers (`#ccc`).
pub const LEGEND_GRAY: Rgb = Rgb::new(0xcc, 0xcc, 0xcc);

/// Marker shape drawn next to a legend entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PointStyle {
    Rect,
    RectRounded,
    Line,
}

/// One entry of a chart legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendLabel {
    pub text: String,
    pub point_style: PointStyle,
    pub fill_style: Color,
    pub stroke_style: Color,
}

/// What a legend generator knows about a series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesInfo {
    pub label: String,
    pub color: Color,
}

/// Plain legend: a rectangle filled with the series color.
#[must_use]
pub fn default_legend_labels(series: &[SeriesInfo]) -> Vec<LegendLabel> {
    series
        .iter()
        .map(|info| LegendLabel {
            text: info.label.clone(),
            point_style: PointStyle::Rect,
            fill_style: info.color,
            stroke_style: info.color,
        })
        .collect()
}

/// Wrap `base` so entries mentioning `Temperature` or `Rain` are restyled.
pub fn wrap_legend_generator<G>(base: G) -> impl Fn(&[SeriesInfo]) -> Vec<LegendLabel>
where
    G: Fn(&[SeriesInfo]) -> Vec<LegendLabel>,
{
    move |series: &[SeriesInfo]| {
        let mut labels = base(series);
        for label in &mut labels {
            if label.text.contains("Temperature") {
                label.point_style = PointStyle::Line;
                label.stroke_style = LEGEND_GRAY.into();
                label.fill_style = LEGEND_GRAY.into();
            } else if label.text.contains("Rain") {
                label.point_style = PointStyle::RectRounded;
                label.fill_style = LEGEND_GRAY.into();
            }
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> Vec<SeriesInfo> {
        vec![
            SeriesInfo {
                label: "Temperature (°C)".to_string(),
                color: Rgb::new(1, 2, 3).into(),
            },
            SeriesInfo {
                label: "Rain (mm)".to_string(),
                color: Rgb::new(4, 5, 6).into(),
            },
            SeriesInfo {
                label: "Wind".to_string(),
                color: Rgb::new(7, 8, 9).into(),
            },
        ]
    }

    #[test]
    fn should_generate_rect_labels_by_default() {
        let labels = default_legend_labels(&series());
        assert_eq!(labels.len(), 3);
        assert!(labels.iter().all(|l| l.point_style == PointStyle::Rect));
        assert_eq!(labels[0].fill_style, Color::Solid(Rgb::new(1, 2, 3)));
    }

    #[test]
    fn should_restyle_temperature_as_gray_line() {
        let generate = wrap_legend_generator(default_legend_labels);
        let labels = generate(&series());
        assert_eq!(labels[0].point_style, PointStyle::Line);
        assert_eq!(labels[0].stroke_style, Color::Solid(LEGEND_GRAY));
        assert_eq!(labels[0].fill_style, Color::Solid(LEGEND_GRAY));
    }

    #[test]
    fn should_restyle_rain_fill_but_keep_stroke() {
        let generate = wrap_legend_generator(default_legend_labels);
        let labels = generate(&series());
        assert_eq!(labels[1].point_style, PointStyle::RectRounded);
        assert_eq!(labels[1].fill_style, Color::Solid(LEGEND_GRAY));
        assert_eq!(labels[1].stroke_style, Color::Solid(Rgb::new(4, 5, 6)));
    }

    #[test]
    fn should_leave_unmatched_labels_untouched() {
        let generate = wrap_legend_generator(default_legend_labels);
        let labels = generate(&series());
        assert_eq!(labels[2], default_legend_labels(&series())[2]);
    }
}
