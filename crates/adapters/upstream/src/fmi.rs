//! Hourly weather forecast from the FMI open data WFS service.
//!
//! The `timevaluepair` stored query returns one `MeasurementTimeseries` per
//! requested parameter. The series id ends with the parameter name, and
//! each point is a `MeasurementTVP` holding a `time` and a `value`.

use std::collections::BTreeMap;
use std::future::Future;

use chrono::{DateTime, Duration, SecondsFormat};
use quick_xml::Reader;
use quick_xml::events::Event;

use infopanel_app::ports::{DataSource, SourceUpdate};
use infopanel_domain::error::InfoPanelError;
use infopanel_domain::status::{WeatherData, WeatherPoint};
use infopanel_domain::time::{Timestamp, abs_diff, now};

use crate::config::UpstreamConfig;
use crate::error::UpstreamError;

pub const STORED_QUERY: &str = "fmi::forecast::harmonie::surface::point::timevaluepair";
pub const PARAMETERS: &str = "temperature,Precipitation1h,Pop";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parameter {
    Temperature,
    Precipitation,
    Pop,
}

impl Parameter {
    fn from_series_id(id: &str) -> Option<Self> {
        if id.contains("temperature") {
            Some(Self::Temperature)
        } else if id.contains("Precipitation1h") {
            Some(Self::Precipitation)
        } else if id.contains("Pop") {
            Some(Self::Pop)
        } else {
            None
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Sample {
    temperature: Option<f64>,
    precipitation: Option<f64>,
    pop: Option<f64>,
}

impl Sample {
    fn set(&mut self, parameter: Parameter, value: f64) {
        match parameter {
            Parameter::Temperature => self.temperature = Some(value),
            Parameter::Precipitation => self.precipitation = Some(value),
            Parameter::Pop => self.pop = Some(value),
        }
    }
}

/// Which text node the reader is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Time,
    Value,
}

/// Missing or `NaN` values count as zero.
fn or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| !v.is_nan()).unwrap_or(0.0)
}

/// `rain` when more than 0.1 mm is expected or the chance is above 50 %.
#[must_use]
pub fn symbol_for(precipitation: f64, pop: f64) -> &'static str {
    if precipitation > 0.1 || pop > 50.0 {
        "rain"
    } else {
        "cloudy"
    }
}

/// Collect every `(parameter, time, value)` of the document.
fn read_samples(xml: &str) -> Result<BTreeMap<Timestamp, Sample>, UpstreamError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut samples: BTreeMap<Timestamp, Sample> = BTreeMap::new();
    let mut parameter = None;
    let mut in_point = false;
    let mut field = Field::None;
    let mut time: Option<Timestamp> = None;
    let mut value: Option<f64> = None;

    loop {
        match reader.read_event()? {
            Event::Start(element) => match element.local_name().as_ref() {
                b"MeasurementTimeseries" => {
                    parameter = None;
                    for attribute in element.attributes() {
                        let attribute = attribute?;
                        if attribute.key.local_name().as_ref() == b"id" {
                            parameter = Parameter::from_series_id(&attribute.unescape_value()?);
                        }
                    }
                }
                b"MeasurementTVP" => {
                    in_point = true;
                    time = None;
                    value = None;
                }
                b"time" if in_point => field = Field::Time,
                b"value" if in_point => field = Field::Value,
                _ => {}
            },
            Event::Text(text) => {
                let text = text.unescape()?;
                match field {
                    Field::Time => {
                        time = DateTime::parse_from_rfc3339(text.trim())
                            .ok()
                            .map(|t| t.to_utc());
                    }
                    Field::Value => value = text.trim().parse().ok(),
                    Field::None => {}
                }
            }
            Event::End(element) => match element.local_name().as_ref() {
                b"MeasurementTVP" => {
                    in_point = false;
                    if let (Some(parameter), Some(at)) = (parameter, time) {
                        samples
                            .entry(at)
                            .or_default()
                            .set(parameter, value.unwrap_or(f64::NAN));
                    }
                }
                b"time" | b"value" => field = Field::None,
                b"MeasurementTimeseries" => parameter = None,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(samples)
}

/// Parse a WFS answer into a forecast sorted by time.
///
/// The current conditions are the point closest to `now`.
///
/// # Errors
///
/// Returns [`UpstreamError::Xml`] when the document is not well-formed.
pub fn parse_forecast(xml: &str, now: Timestamp) -> Result<WeatherData, UpstreamError> {
    let forecast: Vec<WeatherPoint> = read_samples(xml)?
        .into_iter()
        .map(|(time, sample)| {
            let precipitation = or_zero(sample.precipitation);
            let pop = or_zero(sample.pop);
            WeatherPoint {
                temperature: Some(or_zero(sample.temperature)),
                wind_speed: 0.0,
                precipitation: Some(precipitation),
                pop,
                symbol: symbol_for(precipitation, pop).to_string(),
                time,
            }
        })
        .collect();

    let current = forecast
        .iter()
        .min_by_key(|point| abs_diff(point.time, now))
        .cloned();

    Ok(WeatherData { current, forecast })
}

/// Collector for the FMI forecast of one place.
pub struct FmiClient {
    http: reqwest::Client,
    url: String,
    place: String,
}

impl FmiClient {
    #[must_use]
    pub fn new(http: reqwest::Client, config: &UpstreamConfig) -> Self {
        Self {
            http,
            url: config.fmi_api_url.clone(),
            place: config.weather_location.clone(),
        }
    }

    /// Fetch the forecast for the next 24 hours.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] on transport failure, a non-200 status or
    /// malformed XML.
    pub async fn fetch_forecast(&self) -> Result<WeatherData, UpstreamError> {
        let start = now();
        let end = start + Duration::hours(24);
        let response = self
            .http
            .get(&self.url)
            .query(&[
                ("service", "WFS"),
                ("version", "2.0.0"),
                ("request", "getFeature"),
                ("storedquery_id", STORED_QUERY),
                ("place", self.place.as_str()),
                ("timestep", "60"),
                ("parameters", PARAMETERS),
                (
                    "starttime",
                    start.to_rfc3339_opts(SecondsFormat::Secs, true).as_str(),
                ),
                (
                    "endtime",
                    end.to_rfc3339_opts(SecondsFormat::Secs, true).as_str(),
                ),
            ])
            .send()
            .await
            .map_err(UpstreamError::Http)?;
        if !response.status().is_success() {
            return Err(UpstreamError::Status {
                api: "FMI",
                status: response.status().as_u16(),
            });
        }
        let body = response.text().await.map_err(UpstreamError::Http)?;
        parse_forecast(&body, start)
    }
}

impl DataSource for FmiClient {
    fn name(&self) -> &'static str {
        "FMI"
    }

    fn fetch(&self) -> impl Future<Output = Result<SourceUpdate, InfoPanelError>> + Send {
        async move {
            let data = self.fetch_forecast().await?;
            Ok(SourceUpdate::Weather(data))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    const RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs/2.0" xmlns:gml="http://www.opengis.net/gml/3.2" xmlns:om="http://www.opengis.net/om/2.0" xmlns:omso="http://inspire.ec.europa.eu/schemas/omso/3.0" xmlns:wml2="http://www.opengis.net/waterml/2.0">
  <wfs:member>
    <omso:PointTimeSeriesObservation gml:id="obs-obs-1-1-temperature">
      <om:phenomenonTime>
        <gml:TimePeriod gml:id="time-1-1-temperature">
          <gml:beginPosition>2026-10-19T12:00:00Z</gml:beginPosition>
        </gml:TimePeriod>
      </om:phenomenonTime>
      <om:result>
        <wml2:MeasurementTimeseries gml:id="mts-1-1-temperature">
          <wml2:point>
            <wml2:MeasurementTVP>
              <wml2:time>2026-10-19T14:00:00Z</wml2:time>
              <wml2:value>4.5</wml2:value>
            </wml2:MeasurementTVP>
          </wml2:point>
          <wml2:point>
            <wml2:MeasurementTVP>
              <wml2:time>2026-10-19T13:00:00Z</wml2:time>
              <wml2:value>5.1</wml2:value>
            </wml2:MeasurementTVP>
          </wml2:point>
        </wml2:MeasurementTimeseries>
      </om:result>
    </omso:PointTimeSeriesObservation>
  </wfs:member>
  <wfs:member>
    <omso:PointTimeSeriesObservation gml:id="obs-obs-1-1-Precipitation1h">
      <om:result>
        <wml2:MeasurementTimeseries gml:id="mts-1-1-Precipitation1h">
          <wml2:point>
            <wml2:MeasurementTVP>
              <wml2:time>2026-10-19T13:00:00Z</wml2:time>
              <wml2:value>0.4</wml2:value>
            </wml2:MeasurementTVP>
          </wml2:point>
          <wml2:point>
            <wml2:MeasurementTVP>
              <wml2:time>2026-10-19T14:00:00Z</wml2:time>
              <wml2:value>NaN</wml2:value>
            </wml2:MeasurementTVP>
          </wml2:point>
        </wml2:MeasurementTimeseries>
      </om:result>
    </omso:PointTimeSeriesObservation>
  </wfs:member>
  <wfs:member>
    <omso:PointTimeSeriesObservation gml:id="obs-obs-1-1-Pop">
      <om:result>
        <wml2:MeasurementTimeseries gml:id="mts-1-1-Pop">
          <wml2:point>
            <wml2:MeasurementTVP>
              <wml2:time>2026-10-19T14:00:00Z</wml2:time>
              <wml2:value>62</wml2:value>
            </wml2:MeasurementTVP>
          </wml2:point>
        </wml2:MeasurementTimeseries>
      </om:result>
    </omso:PointTimeSeriesObservation>
  </wfs:member>
</wfs:FeatureCollection>"#;

    fn at(hour: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 10, 19, hour, 0, 0).unwrap()
    }

    #[test]
    fn should_merge_series_by_time_in_ascending_order() {
        let weather = parse_forecast(RESPONSE, at(12)).unwrap();
        let times: Vec<Timestamp> = weather.forecast.iter().map(|p| p.time).collect();
        assert_eq!(times, vec![at(13), at(14)]);

        let first = &weather.forecast[0];
        assert!((first.temperature.unwrap() - 5.1).abs() < 1e-9);
        assert!((first.precipitation.unwrap() - 0.4).abs() < 1e-9);
        assert!(first.pop.abs() < f64::EPSILON);
        assert_eq!(first.symbol, "rain");
    }

    #[test]
    fn should_treat_nan_as_zero_and_use_pop_for_symbol() {
        let weather = parse_forecast(RESPONSE, at(12)).unwrap();
        let second = &weather.forecast[1];
        assert_eq!(second.precipitation, Some(0.0));
        assert!((second.pop - 62.0).abs() < f64::EPSILON);
        assert_eq!(second.symbol, "rain");
    }

    #[test]
    fn should_pick_point_closest_to_now_as_current() {
        let now = at(14) - Duration::minutes(10);
        let weather = parse_forecast(RESPONSE, now).unwrap();
        assert_eq!(weather.current.unwrap().time, at(14));
    }

    #[test]
    fn should_return_empty_forecast_without_members() {
        let weather = parse_forecast(
            r#"<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs/2.0"/>"#,
            at(12),
        )
        .unwrap();
        assert!(weather.forecast.is_empty());
        assert!(weather.current.is_none());
    }

    #[test]
    fn should_reject_malformed_xml() {
        let result = parse_forecast("<wfs:FeatureCollection><oops></wfs:FeatureCollection>", at(12));
        assert!(result.is_err());
    }

    #[test]
    fn should_choose_symbol_from_thresholds() {
        assert_eq!(symbol_for(0.1, 50.0), "cloudy");
        assert_eq!(symbol_for(0.11, 0.0), "rain");
        assert_eq!(symbol_for(0.0, 51.0), "rain");
    }
}
