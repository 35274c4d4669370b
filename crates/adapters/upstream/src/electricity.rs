//! Electricity spot prices from spot-hinta.fi.

use std::future::Future;

use chrono::{DateTime, Duration};
use serde::Deserialize;

use infopanel_app::ports::{DataSource, SourceUpdate};
use infopanel_domain::error::InfoPanelError;
use infopanel_domain::status::{ElectricityData, PriceSlot};
use infopanel_domain::time::{Timestamp, now};

use crate::config::UpstreamConfig;
use crate::error::UpstreamError;

/// Length of one market slot.
pub const SLOT_MINUTES: i64 = 15;
/// At most one day of slots is kept.
pub const MAX_SLOTS: usize = 96;

/// One entry of the `TodayAndDayForward` answer. Prices are in €/kWh.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotPrice {
    #[serde(rename = "PriceWithTax")]
    pub price_with_tax: f64,
    #[serde(rename = "DateTime")]
    pub date_time: String,
}

/// Turn raw spot prices into the slots of the next 24 hours.
///
/// Slots that already ended are skipped and the scan stops at the first slot
/// starting after `now + 24h`. Prices are converted to c/kWh. The current
/// price is the slot containing `now`, falling back to the first kept slot.
#[must_use]
pub fn build_electricity(prices: &[SpotPrice], now: Timestamp) -> ElectricityData {
    let window_end = now + Duration::hours(24);
    let mut slots: Vec<PriceSlot> = Vec::new();
    let mut current_price = None;

    for entry in prices {
        let Ok(start) = DateTime::parse_from_rfc3339(&entry.date_time) else {
            tracing::debug!(date_time = %entry.date_time, "skipping unparsable spot price time");
            continue;
        };
        let start = start.to_utc();
        let slot = PriceSlot {
            price: Some(entry.price_with_tax * 100.0),
            start_time: start,
            end_time: start + Duration::minutes(SLOT_MINUTES),
        };
        if slot.end_time < now {
            continue;
        }
        if slot.start_time > window_end {
            break;
        }
        if current_price.is_none() && slot.contains(now) {
            current_price = slot.price;
        }
        slots.push(slot);
        if slots.len() >= MAX_SLOTS {
            break;
        }
    }

    ElectricityData {
        current_price: current_price.or_else(|| slots.first().and_then(|slot| slot.price)),
        prices: slots,
        timestamp: Some(now),
    }
}

/// Collector for spot-hinta.fi.
pub struct ElectricityClient {
    http: reqwest::Client,
    url: String,
}

impl ElectricityClient {
    #[must_use]
    pub fn new(http: reqwest::Client, config: &UpstreamConfig) -> Self {
        Self {
            http,
            url: config.spot_api_url.clone(),
        }
    }

    /// Fetch and convert the current price list.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] on transport failure, a non-200 status or
    /// a malformed body.
    pub async fn fetch_prices(&self) -> Result<ElectricityData, UpstreamError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(UpstreamError::Http)?;
        if !response.status().is_success() {
            return Err(UpstreamError::Status {
                api: "electricity",
                status: response.status().as_u16(),
            });
        }
        let body = response.bytes().await.map_err(UpstreamError::Http)?;
        let prices: Vec<SpotPrice> =
            serde_json::from_slice(&body).map_err(|source| UpstreamError::Json {
                api: "electricity",
                source,
            })?;
        Ok(build_electricity(&prices, now()))
    }
}

impl DataSource for ElectricityClient {
    fn name(&self) -> &'static str {
        "Electricity"
    }

    fn fetch(&self) -> impl Future<Output = Result<SourceUpdate, InfoPanelError>> + Send {
        async move {
            let data = self.fetch_prices().await?;
            Ok(SourceUpdate::Electricity(data))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 5, 0).unwrap()
    }

    fn spot(date_time: &str, euros: f64) -> SpotPrice {
        SpotPrice {
            price_with_tax: euros,
            date_time: date_time.to_string(),
        }
    }

    #[test]
    fn should_parse_spot_hinta_json() {
        let body = r#"[
            {"Rank": 3, "DateTime": "2026-10-19T15:00:00+03:00", "PriceNoTax": 0.05, "PriceWithTax": 0.0628},
            {"Rank": 9, "DateTime": "2026-10-19T15:15:00+03:00", "PriceNoTax": 0.04, "PriceWithTax": 0.0502}
        ]"#;
        let prices: Vec<SpotPrice> = serde_json::from_str(body).unwrap();
        let data = build_electricity(&prices, now());
        assert_eq!(data.prices.len(), 2);
        assert_eq!(
            data.prices[0].start_time,
            Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
        );
        assert!((data.prices[0].price.unwrap() - 6.28).abs() < 1e-9);
        assert!((data.current_price.unwrap() - 6.28).abs() < 1e-9);
        assert_eq!(data.timestamp, Some(now()));
    }

    #[test]
    fn should_skip_finished_slots() {
        let prices = vec![
            spot("2026-10-19T11:30:00Z", 0.01),
            spot("2026-10-19T12:00:00Z", 0.02),
            spot("2026-10-19T12:15:00Z", 0.03),
        ];
        let data = build_electricity(&prices, now());
        assert_eq!(data.prices.len(), 2);
        assert!((data.current_price.unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn should_fall_back_to_first_slot_for_current_price() {
        let prices = vec![spot("2026-10-19T13:00:00Z", 0.07)];
        let data = build_electricity(&prices, now());
        assert!((data.current_price.unwrap() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn should_leave_current_price_empty_without_slots() {
        let data = build_electricity(&[], now());
        assert!(data.current_price.is_none());
        assert!(data.prices.is_empty());
    }

    #[test]
    fn should_stop_after_window_end() {
        let prices = vec![
            spot("2026-10-19T12:00:00Z", 0.01),
            spot("2026-10-20T12:30:00Z", 0.02),
            spot("2026-10-19T13:00:00Z", 0.03),
        ];
        let data = build_electricity(&prices, now());
        assert_eq!(data.prices.len(), 1);
    }

    #[test]
    fn should_cap_at_one_day_of_slots() {
        let start = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let prices: Vec<SpotPrice> = (0..100)
            .map(|i| {
                let at = start + Duration::minutes(i * SLOT_MINUTES);
                spot(&at.to_rfc3339(), 0.01)
            })
            .collect();
        let data = build_electricity(&prices, now());
        assert_eq!(data.prices.len(), MAX_SLOTS);
    }

    #[test]
    fn should_skip_unparsable_times() {
        let prices = vec![spot("yesterday", 0.5), spot("2026-10-19T12:00:00Z", 0.01)];
        let data = build_electricity(&prices, now());
        assert_eq!(data.prices.len(), 1);
    }
}
