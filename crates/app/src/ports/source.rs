//! Source port: one upstream collector feeding a section of the snapshot.

use std::future::Future;
use std::sync::Arc;

use infopanel_domain::error::InfoPanelError;
use infopanel_domain::status::{ElectricityData, TransportData, WeatherData};

/// A fresh section of the status snapshot produced by a [`DataSource`].
#[derive(Debug, Clone, PartialEq)]
pub enum SourceUpdate {
    Weather(WeatherData),
    Transport(TransportData),
    Electricity(ElectricityData),
}

/// An upstream service polled on a fixed interval.
///
/// Implementations live in adapter crates (e.g. `adapter_upstream`). A fetch
/// returns the complete replacement for its section; the caller decides
/// where it goes.
pub trait DataSource: Send + Sync {
    /// Short name used in logs and the API call timeline (e.g. `"HSL"`).
    fn name(&self) -> &'static str;

    /// Fetch and decode the latest data.
    fn fetch(&self) -> impl Future<Output = Result<SourceUpdate, InfoPanelError>> + Send;
}

impl<T: DataSource> DataSource for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn fetch(&self) -> impl Future<Output = Result<SourceUpdate, InfoPanelError>> + Send {
        (**self).fetch()
    }
}
