//! Color ramp engine: maps price, temperature and rain values to colors.
//!
//! A value is first normalized around a profile-specific center into
//! `[0, 1]`, then sampled on a two-segment ramp:
//!
//! - price / temperature: blue → mid gray → red
//! - rain: light blue → mid blue → deep blue
//!
//! Missing prices and dry rain slots use fixed translucent colors instead
//! of a ramp sample. The two constants differ on purpose and must stay
//! distinct.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::ValidationError;

/// Smallest scale accepted by [`normalize`].
pub const MIN_SCALE: f64 = 0.0001;

/// Bar color for a price slot without a value.
pub const MISSING_PRICE: Color = Color::Translucent {
    rgb: Rgb::new(255, 255, 255),
    alpha: 0.2,
};

/// Bar color for a forecast hour without rain.
pub const NO_RAIN: Color = Color::Translucent {
    rgb: Rgb::new(167, 201, 255),
    alpha: 0.2,
};

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A gray with `level` on every channel (rounded, clamped to `0..=255`).
    #[must_use]
    pub fn gray(level: f64) -> Self {
        let level = channel_clamp(level);
        Self::new(level, level, level)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ValidationError;

    /// Parse `#rgb` or `#rrggbb` (leading `#` optional, any case).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidHexColor(s.to_string());
        let clean = s.strip_prefix('#').unwrap_or(s);
        if !clean.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let expanded = match clean.len() {
            3 => clean.chars().flat_map(|ch| [ch, ch]).collect::<String>(),
            6 => clean.to_string(),
            _ => return Err(invalid()),
        };
        let value = u32::from_str_radix(&expanded, 16).map_err(|_| invalid())?;
        let [_, r, g, b] = value.to_be_bytes();
        Ok(Self::new(r, g, b))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A fill or stroke color as emitted to the charts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Solid(Rgb),
    Translucent { rgb: Rgb, alpha: f64 },
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::Solid(rgb)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solid(rgb) => rgb.fmt(f),
            Self::Translucent { rgb, alpha } => {
                write!(f, "rgba({}, {}, {}, {alpha})", rgb.r, rgb.g, rgb.b)
            }
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Clamp to `[0, 1]`.
#[must_use]
pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Round and clamp a channel value to `0..=255`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn channel_clamp(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0).round() as u8
}

/// Map `value` into `[0, 1]` around `center`; non-finite values map to `0.5`.
#[must_use]
pub fn normalize(value: f64, center: f64, scale: f64) -> f64 {
    if !value.is_finite() {
        return 0.5;
    }
    let safe_scale = scale.max(MIN_SCALE);
    clamp01(0.5 + (value - center) / safe_scale)
}

/// Linear per-channel interpolation from `a` to `b`.
#[must_use]
pub fn blend(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let ratio = clamp01(t);
    let mix = |from: u8, to: u8| {
        let from = f64::from(from);
        channel_clamp(from + (f64::from(to) - from) * ratio)
    };
    Rgb::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
}

/// Sample a three-stop ramp at `position` (clamped to `[0, 1]`).
fn sample(low: Rgb, mid: Rgb, high: Rgb, position: f64) -> Rgb {
    let clamped = clamp01(position);
    if clamped <= 0.5 {
        blend(low, mid, clamped / 0.5)
    } else {
        blend(mid, high, (clamped - 0.5) / 0.5)
    }
}

/// Centers, scales and reference colors of every ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorProfile {
    pub price_center: f64,
    pub price_scale: f64,
    pub temp_center: f64,
    pub temp_scale: f64,
    pub rain_center: f64,
    pub rain_scale: f64,
    pub mid_brightness: f64,
    pub blue: Rgb,
    pub red: Rgb,
    pub rain_light: Rgb,
    pub rain_mid: Rgb,
    pub rain_deep: Rgb,
}

impl ColorProfile {
    /// The dashboard's fixed profile (c/kWh prices, °C, mm/h).
    pub const DEFAULT: Self = Self {
        price_center: 15.0,
        price_scale: 10.0,
        temp_center: 0.0,
        temp_scale: 12.0,
        rain_center: 0.6,
        rain_scale: 1.8,
        mid_brightness: 210.0,
        blue: Rgb::new(0x14, 0x67, 0xff),
        red: Rgb::new(0xff, 0x7c, 0x75),
        rain_light: Rgb::new(0xa7, 0xc9, 0xff),
        rain_mid: Rgb::new(0x4f, 0x8b, 0xdc),
        rain_deep: Rgb::new(0x0d, 0x2f, 0x6f),
    };

    /// The gray at the center of the price/temperature ramp.
    #[must_use]
    pub fn mid_gray(&self) -> Rgb {
        Rgb::gray(self.mid_brightness)
    }

    /// Sample the blue → gray → red ramp.
    #[must_use]
    pub fn sample_ramp(&self, position: f64) -> Rgb {
        sample(self.blue, self.mid_gray(), self.red, position)
    }

    /// Sample the light → mid → deep blue rain ramp.
    #[must_use]
    pub fn sample_rain_ramp(&self, position: f64) -> Rgb {
        sample(self.rain_light, self.rain_mid, self.rain_deep, position)
    }

    /// Normalize `value` around `center`/`scale` and sample the main ramp.
    #[must_use]
    pub fn color_for(&self, value: f64, center: f64, scale: f64) -> Rgb {
        self.sample_ramp(normalize(value, center, scale))
    }

    /// Bar color for an electricity price in c/kWh.
    #[must_use]
    pub fn price_color(&self, price: Option<f64>) -> Color {
        match price {
            Some(price) => self
                .color_for(price, self.price_center, self.price_scale)
                .into(),
            None => MISSING_PRICE,
        }
    }

    /// Line color for a temperature in °C; missing values sit at the midpoint.
    #[must_use]
    pub fn temp_color(&self, temp: Option<f64>) -> Rgb {
        match temp {
            Some(temp) => self.color_for(temp, self.temp_center, self.temp_scale),
            None => self.sample_ramp(0.5),
        }
    }

    /// Bar color for a rain amount in mm; dry or missing uses [`NO_RAIN`].
    #[must_use]
    pub fn rain_color(&self, amount: Option<f64>) -> Color {
        match amount {
            Some(amount) if amount > 0.0 => self
                .sample_rain_ramp(normalize(amount, self.rain_center, self.rain_scale))
                .into(),
            _ => NO_RAIN,
        }
    }
}

impl Default for ColorProfile {
    fn default() -> Self {
        Self::DEFAULT
    }
}
