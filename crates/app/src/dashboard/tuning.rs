//! Tuning parameters adjustable from the optional control panel.

use std::ops::RangeInclusive;

use serde::Serialize;

use infopanel_domain::error::ValidationError;

/// Accepted chart font sizes in pixels.
pub const GRAPH_FONT_RANGE: RangeInclusive<i64> = 8..=40;

/// Accepted bus list scale, in percent.
pub const BUS_SCALE_PERCENT_RANGE: RangeInclusive<i64> = 50..=300;

/// Font settings shared by every render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tuning {
    /// Tick label size of both charts, in pixels.
    pub graph_font_size: u32,
    /// Multiplier applied to the bus list through a style variable.
    pub bus_font_scale: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            graph_font_size: 16,
            bus_font_scale: 1.5,
        }
    }
}

impl Tuning {
    /// Bus scale as a whole percentage, as shown on the slider.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn bus_font_scale_percent(&self) -> u32 {
        (self.bus_font_scale * 100.0).round().max(0.0) as u32
    }

    /// Inline style declaring the `--bus-font-scale` variable.
    #[must_use]
    pub fn bus_font_style(&self) -> String {
        format!("--bus-font-scale: {}", self.bus_font_scale)
    }
}

fn check(value: i64, range: &RangeInclusive<i64>) -> Result<(), ValidationError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::TuningOutOfRange {
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Validate a slider value for the graph font size.
///
/// # Errors
///
/// Returns [`ValidationError::TuningOutOfRange`] outside [`GRAPH_FONT_RANGE`].
pub fn graph_font_size(px: i64) -> Result<u32, ValidationError> {
    check(px, &GRAPH_FONT_RANGE)?;
    u32::try_from(px).map_err(|_| ValidationError::TuningOutOfRange {
        value: px,
        min: *GRAPH_FONT_RANGE.start(),
        max: *GRAPH_FONT_RANGE.end(),
    })
}

/// Validate a slider percentage and turn it into a scale factor.
///
/// # Errors
///
/// Returns [`ValidationError::TuningOutOfRange`] outside [`BUS_SCALE_PERCENT_RANGE`].
#[allow(clippy::cast_precision_loss)]
pub fn bus_font_scale(percent: i64) -> Result<f64, ValidationError> {
    check(percent, &BUS_SCALE_PERCENT_RANGE)?;
    Ok(percent as f64 / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_sixteen_px_and_one_and_a_half_scale() {
        let tuning = Tuning::default();
        assert_eq!(tuning.graph_font_size, 16);
        assert_eq!(tuning.bus_font_scale_percent(), 150);
        assert_eq!(tuning.bus_font_style(), "--bus-font-scale: 1.5");
    }

    #[test]
    fn should_accept_values_inside_ranges() {
        assert_eq!(graph_font_size(22).unwrap(), 22);
        assert!((bus_font_scale(125).unwrap() - 1.25).abs() < f64::EPSILON);
    }

    #[test]
    fn should_reject_values_outside_ranges() {
        assert_eq!(
            graph_font_size(2),
            Err(ValidationError::TuningOutOfRange {
                value: 2,
                min: 8,
                max: 40
            })
        );
        assert!(bus_font_scale(301).is_err());
        assert!(bus_font_scale(-5).is_err());
    }
}
