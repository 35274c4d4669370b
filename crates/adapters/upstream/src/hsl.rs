//! HSL departures from the Digitransit routing API.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::future::Future;

use chrono::DateTime;
use serde::Deserialize;

use infopanel_app::ports::{DataSource, SourceUpdate};
use infopanel_domain::error::InfoPanelError;
use infopanel_domain::status::{Departure, StopDepartures, TransportData};
use infopanel_domain::time::{Timestamp, now};

use crate::config::{BusStop, UpstreamConfig};
use crate::error::UpstreamError;

const SUBSCRIPTION_HEADER: &str = "digitransit-subscription-key";
/// Departures requested per stop.
pub const DEPARTURES_PER_STOP: usize = 4;

#[derive(Debug, Deserialize)]
pub struct RoutingResponse {
    #[serde(default)]
    pub data: HashMap<String, Option<StopResponse>>,
}

#[derive(Debug, Deserialize)]
pub struct StopResponse {
    #[serde(default, rename = "stoptimesWithoutPatterns")]
    pub stoptimes: Vec<Stoptime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stoptime {
    /// Seconds after `service_day`.
    pub realtime_departure: i64,
    pub realtime: bool,
    /// Unix time of the service day's midnight.
    pub service_day: i64,
    #[serde(default)]
    pub headsign: String,
    pub trip: Trip,
}

#[derive(Debug, Deserialize)]
pub struct Trip {
    pub route: Route,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub short_name: String,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: FeatureProperties,
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    gid: String,
}

/// Alias of the `index`-th configured stop in the query.
#[must_use]
pub fn stop_alias(index: usize) -> String {
    format!("stop{index}")
}

/// Build one GraphQL document querying every `(alias index, gtfs id)` pair.
#[must_use]
pub fn build_query(stops: &[(usize, String)]) -> String {
    let mut query = String::from("{\n");
    for (index, gtfs_id) in stops {
        let _ = write!(
            query,
            r#"  {alias}: stop(id: "{gtfs_id}") {{
    name
    stoptimesWithoutPatterns(numberOfDepartures: {DEPARTURES_PER_STOP}) {{
      scheduledDeparture
      realtimeDeparture
      realtime
      serviceDay
      headsign
      trip {{ route {{ shortName }} }}
    }}
  }}
"#,
            alias = stop_alias(*index),
        );
    }
    query.push('}');
    query
}

/// Extract the GTFS stop id from a geocoder gid.
///
/// `gtfshsl:stop:GTFS:HSL:1234567#E2185` becomes `HSL:1234567`.
///
/// # Errors
///
/// Returns [`UpstreamError::UnexpectedGid`] when the gid has fewer than five
/// `:`-separated parts.
pub fn parse_gid(gid: &str) -> Result<String, UpstreamError> {
    let stop = gid
        .split(':')
        .nth(4)
        .ok_or_else(|| UpstreamError::UnexpectedGid(gid.to_string()))?;
    let stop = stop.split('#').next().unwrap_or(stop);
    Ok(format!("HSL:{stop}"))
}

/// Map the routing answer back onto the configured stops.
///
/// Stops keep their configured order and name; stops missing from the
/// answer are left out.
#[must_use]
pub fn build_transport(
    response: RoutingResponse,
    stops: &[BusStop],
    now: Timestamp,
) -> TransportData {
    let mut data = response.data;
    let stops = stops
        .iter()
        .enumerate()
        .filter_map(|(index, stop)| {
            let Some(Some(answer)) = data.remove(&stop_alias(index)) else {
                tracing::debug!(stop = %stop.name, "no data for stop");
                return None;
            };
            let departures = answer
                .stoptimes
                .into_iter()
                .filter_map(|stoptime| {
                    let time = DateTime::from_timestamp(
                        stoptime.service_day + stoptime.realtime_departure,
                        0,
                    )?;
                    Some(Departure {
                        route_number: stoptime.trip.route.short_name,
                        destination: stoptime.headsign,
                        time,
                        realtime: stoptime.realtime,
                    })
                })
                .collect();
            Some(StopDepartures {
                stop_name: stop.name.clone(),
                departures,
            })
        })
        .collect();

    TransportData {
        stops,
        timestamp: Some(now),
    }
}

/// Collector for the configured HSL stops.
pub struct HslClient {
    http: reqwest::Client,
    api_url: String,
    geocoding_url: String,
    key: String,
    stops: Vec<BusStop>,
}

impl HslClient {
    #[must_use]
    pub fn new(http: reqwest::Client, config: &UpstreamConfig) -> Self {
        Self {
            http,
            api_url: config.hsl_api_url.clone(),
            geocoding_url: config.geocoding_url.clone(),
            key: config.hsl_api_key.trim().to_string(),
            stops: config.bus_stops.clone(),
        }
    }

    /// Resolve a short stop code (e.g. `E2185`) into a GTFS id.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] when the key is missing, the request fails
    /// or the geocoder has no matching stop.
    pub async fn lookup_stop(&self, code: &str) -> Result<String, UpstreamError> {
        if self.key.is_empty() {
            return Err(UpstreamError::MissingKey);
        }
        let response = self
            .http
            .get(&self.geocoding_url)
            .header(SUBSCRIPTION_HEADER, &self.key)
            .query(&[
                ("text", code),
                ("size", "1"),
                ("layers", "stop"),
                ("sources", "gtfshsl"),
            ])
            .send()
            .await
            .map_err(UpstreamError::Http)?;
        if !response.status().is_success() {
            return Err(UpstreamError::Status {
                api: "geocoding",
                status: response.status().as_u16(),
            });
        }
        let body = response.bytes().await.map_err(UpstreamError::Http)?;
        let answer: GeocodingResponse =
            serde_json::from_slice(&body).map_err(|source| UpstreamError::Json {
                api: "geocoding",
                source,
            })?;
        let feature = answer
            .features
            .first()
            .ok_or_else(|| UpstreamError::NoFeatures(code.to_string()))?;
        parse_gid(&feature.properties.gid)
    }

    /// GTFS ids of the configured stops, resolving short codes.
    ///
    /// Stops that cannot be resolved are skipped.
    async fn resolve_stops(&self) -> Vec<(usize, String)> {
        let mut resolved = Vec::with_capacity(self.stops.len());
        for (index, stop) in self.stops.iter().enumerate() {
            if stop.id.starts_with("HSL:") {
                resolved.push((index, stop.id.clone()));
                continue;
            }
            match self.lookup_stop(&stop.id).await {
                Ok(gtfs_id) => {
                    tracing::info!(code = %stop.id, gtfs_id = %gtfs_id, "resolved stop code");
                    resolved.push((index, gtfs_id));
                }
                Err(err) => tracing::warn!(code = %stop.id, error = %err, "failed to resolve stop"),
            }
        }
        resolved
    }

    /// Fetch the next departures of every configured stop.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] on transport failure, a non-200 status or
    /// a malformed body.
    pub async fn fetch_departures(&self) -> Result<TransportData, UpstreamError> {
        let query = build_query(&self.resolve_stops().await);
        let response = self
            .http
            .post(&self.api_url)
            .header(SUBSCRIPTION_HEADER, &self.key)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .map_err(UpstreamError::Http)?;
        if !response.status().is_success() {
            return Err(UpstreamError::Status {
                api: "HSL",
                status: response.status().as_u16(),
            });
        }
        let body = response.bytes().await.map_err(UpstreamError::Http)?;
        let answer: RoutingResponse =
            serde_json::from_slice(&body).map_err(|source| UpstreamError::Json { api: "HSL", source })?;
        tracing::debug!(stops = answer.data.len(), "received departures");
        Ok(build_transport(answer, &self.stops, now()))
    }
}

impl DataSource for HslClient {
    fn name(&self) -> &'static str {
        "HSL"
    }

    fn fetch(&self) -> impl Future<Output = Result<SourceUpdate, InfoPanelError>> + Send {
        async move {
            let data = self.fetch_departures().await?;
            Ok(SourceUpdate::Transport(data))
        }
    }
}
