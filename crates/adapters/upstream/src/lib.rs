//! # infopanel-adapter-upstream
//!
//! Outbound HTTP adapters that feed the status store.
//!
//! ## Responsibilities
//! - [`ElectricityClient`]: spot prices from spot-hinta.fi (15 min slots)
//! - [`FmiClient`]: hourly forecast from the FMI open data WFS service
//! - [`HslClient`]: next departures from the Digitransit routing API, and
//!   stop code lookup through the Digitransit geocoder
//! - [`HttpStatusProvider`]: reads a complete snapshot from another
//!   instance's `/api/status`
//!
//! Each collector implements [`DataSource`](infopanel_app::ports::DataSource);
//! parsing is done by pure functions so it can be tested without a network.
//!
//! ## Dependency rule
//! Depends on `infopanel-app` (ports) and `infopanel-domain` (status model).

pub mod config;
pub mod electricity;
pub mod error;
pub mod fmi;
pub mod hsl;
pub mod status_client;

use std::time::Duration;

pub use config::{BusStop, UpstreamConfig};
pub use electricity::ElectricityClient;
pub use error::UpstreamError;
pub use fmi::FmiClient;
pub use hsl::HslClient;
pub use status_client::HttpStatusProvider;

/// Build the HTTP client shared by every collector.
///
/// # Errors
///
/// Returns [`UpstreamError::Http`] if the TLS backend cannot be initialised.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, UpstreamError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("infopanel/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(UpstreamError::Http)
}
