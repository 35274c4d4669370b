//! Status snapshot: the aggregate served on `/api/status`.
//!
//! Each section is replaced wholesale by the collector that owns it. The
//! dashboard consumes a snapshot read-only and never merges two snapshots.
//! Deserialization is lenient: missing sections, missing fields and `null`
//! lists all fall back to empty defaults.

use serde::{Deserialize, Deserializer, Serialize};

use crate::time::Timestamp;

/// Everything the panel knows right now.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusSnapshot {
    pub weather: WeatherData,
    pub transport: TransportData,
    pub electricity: ElectricityData,
}

/// Current conditions plus the hourly forecast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherData {
    pub current: Option<WeatherPoint>,
    #[serde(deserialize_with = "null_as_default")]
    pub forecast: Vec<WeatherPoint>,
}

/// One forecast hour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherPoint {
    /// °C, `None` when the reading is null or missing.
    pub temperature: Option<f64>,
    /// m/s
    pub wind_speed: f64,
    /// mm over the hour; `None` reads as dry.
    pub precipitation: Option<f64>,
    /// Probability of precipitation, percent.
    pub pop: f64,
    pub symbol: String,
    pub time: Timestamp,
}

/// Departures grouped by stop, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportData {
    #[serde(deserialize_with = "null_as_default")]
    pub stops: Vec<StopDepartures>,
    pub timestamp: Option<Timestamp>,
}

/// Upcoming departures from one stop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopDepartures {
    pub stop_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub departures: Vec<Departure>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Departure {
    pub route_number: String,
    pub destination: String,
    pub time: Timestamp,
    /// `true` when `time` comes from live vehicle tracking.
    pub realtime: bool,
}

/// Spot prices in c/kWh (VAT included).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectricityData {
    pub current_price: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub prices: Vec<PriceSlot>,
    pub timestamp: Option<Timestamp>,
}

/// Price of one market slot `[start_time, end_time)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceSlot {
    /// c/kWh, `None` when the market gave no price for the slot.
    pub price: Option<f64>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

impl PriceSlot {
    /// Whether the slot intersects the half-open window `[from, to)`.
    #[must_use]
    pub fn overlaps(&self, from: Timestamp, to: Timestamp) -> bool {
        self.end_time > from && self.start_time < to
    }

    /// Whether `at` falls inside the slot.
    #[must_use]
    pub fn contains(&self, at: Timestamp) -> bool {
        self.start_time <= at && at < self.end_time
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
