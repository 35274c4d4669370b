//! In-process status store shared by collectors, the HTTP API and the dashboard.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use infopanel_domain::diagnostics::{
    API_CALL_CAPACITY, ApiCallLog, DebugData, DeviceInfo, LOG_CAPACITY, LogEntry,
};
use infopanel_domain::error::InfoPanelError;
use infopanel_domain::status::{ElectricityData, StatusSnapshot, TransportData, WeatherData};
use infopanel_domain::time::now;

use crate::ports::{SourceUpdate, StatusProvider};

#[derive(Default)]
struct Inner {
    snapshot: StatusSnapshot,
    api_calls: VecDeque<ApiCallLog>,
    logs: VecDeque<LogEntry>,
    device: DeviceInfo,
}

/// Thread-safe holder of the latest snapshot and the diagnostics buffers.
///
/// Reads hand out copies, so no lock is held while a response is encoded.
/// Each section of the snapshot is replaced as a whole.
#[derive(Default)]
pub struct StatusStore {
    inner: RwLock<Inner>,
}

impl StatusStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> StatusSnapshot {
        self.read().snapshot.clone()
    }

    pub fn update_weather(&self, weather: WeatherData) {
        self.write().snapshot.weather = weather;
    }

    pub fn update_transport(&self, transport: TransportData) {
        self.write().snapshot.transport = transport;
    }

    pub fn update_electricity(&self, electricity: ElectricityData) {
        self.write().snapshot.electricity = electricity;
    }

    /// Replace the section carried by `update`.
    pub fn apply(&self, update: SourceUpdate) {
        match update {
            SourceUpdate::Weather(weather) => self.update_weather(weather),
            SourceUpdate::Transport(transport) => self.update_transport(transport),
            SourceUpdate::Electricity(electricity) => self.update_electricity(electricity),
        }
    }

    /// Append to the call timeline, dropping the oldest entry past capacity.
    pub fn add_api_call(&self, call: ApiCallLog) {
        let mut inner = self.write();
        if inner.api_calls.len() >= API_CALL_CAPACITY {
            inner.api_calls.pop_front();
        }
        inner.api_calls.push_back(call);
    }

    /// Append a captured log line, dropping the oldest past capacity.
    pub fn add_log(&self, message: impl Into<String>) {
        let entry = LogEntry {
            timestamp: now(),
            message: message.into(),
        };
        let mut inner = self.write();
        if inner.logs.len() >= LOG_CAPACITY {
            inner.logs.pop_front();
        }
        inner.logs.push_back(entry);
    }

    pub fn update_device_info(&self, device: DeviceInfo) {
        self.write().device = device;
    }

    /// Copy of all diagnostics buffers.
    #[must_use]
    pub fn debug_data(&self) -> DebugData {
        let inner = self.read();
        DebugData {
            api_calls: inner.api_calls.iter().cloned().collect(),
            app_logs: inner.logs.iter().cloned().collect(),
            device: inner.device.clone(),
        }
    }
}

impl StatusProvider for StatusStore {
    fn status(&self) -> impl Future<Output = Result<StatusSnapshot, InfoPanelError>> + Send {
        let snapshot = self.snapshot();
        async move { Ok(snapshot) }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use infopanel_domain::status::{PriceSlot, StopDepartures};

    use super::*;

    fn call(n: usize) -> ApiCallLog {
        ApiCallLog::new(format!("source-{n}"), now(), Duration::from_millis(1), None)
    }

    #[test]
    fn should_start_with_empty_snapshot() {
        let store = StatusStore::new();
        assert_eq!(store.snapshot(), StatusSnapshot::default());
        assert!(store.debug_data().api_calls.is_empty());
    }

    #[test]
    fn should_replace_only_the_updated_section() {
        let store = StatusStore::new();
        store.update_transport(TransportData {
            stops: vec![StopDepartures {
                stop_name: "Tapiola".to_string(),
                departures: vec![],
            }],
            timestamp: Some(now()),
        });
        store.apply(SourceUpdate::Electricity(ElectricityData {
            current_price: Some(7.0),
            prices: vec![PriceSlot::default()],
            timestamp: None,
        }));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.transport.stops.len(), 1);
        assert_eq!(snapshot.electricity.current_price, Some(7.0));
        assert!(snapshot.weather.current.is_none());
    }

    #[test]
    fn should_replace_section_wholesale() {
        let store = StatusStore::new();
        store.update_electricity(ElectricityData {
            current_price: Some(7.0),
            prices: vec![PriceSlot::default(), PriceSlot::default()],
            timestamp: None,
        });
        store.update_electricity(ElectricityData::default());
        let snapshot = store.snapshot();
        assert!(snapshot.electricity.prices.is_empty());
        assert!(snapshot.electricity.current_price.is_none());
    }

    #[test]
    fn should_keep_last_fifty_api_calls() {
        let store = StatusStore::new();
        for n in 0..60 {
            store.add_api_call(call(n));
        }
        let calls = store.debug_data().api_calls;
        assert_eq!(calls.len(), API_CALL_CAPACITY);
        assert_eq!(calls[0].source, "source-10");
        assert_eq!(calls[49].source, "source-59");
    }

    #[test]
    fn should_keep_last_hundred_logs() {
        let store = StatusStore::new();
        for n in 0..105 {
            store.add_log(format!("line {n}"));
        }
        let logs = store.debug_data().app_logs;
        assert_eq!(logs.len(), LOG_CAPACITY);
        assert_eq!(logs[0].message, "line 5");
        assert_eq!(logs[99].message, "line 104");
    }

    #[test]
    fn should_store_device_info() {
        let store = StatusStore::new();
        store.update_device_info(DeviceInfo {
            uptime: "5s".to_string(),
            num_cpu: 4,
            ..DeviceInfo::default()
        });
        assert_eq!(store.debug_data().device.num_cpu, 4);
    }

    #[tokio::test]
    async fn should_provide_current_snapshot_as_status() {
        let store = StatusStore::new();
        store.update_electricity(ElectricityData {
            current_price: Some(1.25),
            ..ElectricityData::default()
        });
        let snapshot = store.status().await.unwrap();
        assert_eq!(snapshot.electricity.current_price, Some(1.25));
    }
}
