//! Upstream endpoints, credentials and polling intervals.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Shown instead of the HSL key on diagnostics endpoints.
pub const MASKED: &str = "***MASKED***";

/// A bus stop to show on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusStop {
    /// Either a GTFS id (`HSL:1234567`) or a short code (`E2185`) that is
    /// resolved through the geocoder on every fetch.
    pub id: String,
    /// Display name; the API's own stop name is ignored.
    pub name: String,
}

/// Configuration of every upstream collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub spot_api_url: String,
    pub fmi_api_url: String,
    pub hsl_api_url: String,
    pub geocoding_url: String,
    /// Digitransit subscription key.
    pub hsl_api_key: String,
    /// FMI place name.
    pub weather_location: String,
    pub bus_stops: Vec<BusStop>,
    pub transport_interval_secs: u64,
    pub weather_interval_secs: u64,
    pub electricity_interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            spot_api_url: "https://api.spot-hinta.fi/TodayAndDayForward?region=FI&priceResolution=15"
                .to_string(),
            fmi_api_url: "https://opendata.fmi.fi/wfs".to_string(),
            hsl_api_url: "https://api.digitransit.fi/routing/v2/hsl/gtfs/v1".to_string(),
            geocoding_url: "https://api.digitransit.fi/geocoding/v1/search".to_string(),
            hsl_api_key: String::new(),
            weather_location: "Espoo".to_string(),
            bus_stops: Vec::new(),
            transport_interval_secs: 300,
            weather_interval_secs: 900,
            electricity_interval_secs: 900,
            request_timeout_secs: 10,
        }
    }
}

impl UpstreamConfig {
    #[must_use]
    pub fn transport_interval(&self) -> Duration {
        Duration::from_secs(self.transport_interval_secs)
    }

    #[must_use]
    pub fn weather_interval(&self) -> Duration {
        Duration::from_secs(self.weather_interval_secs)
    }

    #[must_use]
    pub fn electricity_interval(&self) -> Duration {
        Duration::from_secs(self.electricity_interval_secs)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Whether a Digitransit key is configured.
    #[must_use]
    pub fn has_hsl_key(&self) -> bool {
        !self.hsl_api_key.trim().is_empty()
    }

    /// Copy with the HSL key replaced by [`MASKED`], if one is set.
    #[must_use]
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        if !copy.hsl_api_key.is_empty() {
            copy.hsl_api_key = MASKED.to_string();
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_use_public_endpoints_by_default() {
        let config = UpstreamConfig::default();
        assert_eq!(config.fmi_api_url, "https://opendata.fmi.fi/wfs");
        assert_eq!(config.weather_location, "Espoo");
        assert_eq!(config.transport_interval(), Duration::from_secs(300));
        assert_eq!(config.weather_interval(), Duration::from_secs(900));
        assert_eq!(config.electricity_interval(), Duration::from_secs(900));
        assert!(config.bus_stops.is_empty());
        assert!(!config.has_hsl_key());
    }

    #[test]
    fn should_deserialize_partial_toml() {
        let config: UpstreamConfig = toml::from_str(
            r#"
            weather_location = "Helsinki"

            [[bus_stops]]
            id = "E2185"
            name = "Tapiola (M)"
            "#,
        )
        .unwrap();
        assert_eq!(config.weather_location, "Helsinki");
        assert_eq!(config.bus_stops[0].id, "E2185");
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn should_mask_key_when_present() {
        let config = UpstreamConfig {
            hsl_api_key: "secret".to_string(),
            ..UpstreamConfig::default()
        };
        assert_eq!(config.masked().hsl_api_key, MASKED);
        assert_eq!(config.hsl_api_key, "secret");
    }

    #[test]
    fn should_leave_empty_key_unmasked() {
        assert_eq!(UpstreamConfig::default().masked().hsl_api_key, "");
    }
}
