//! Periodic device sampling for `/api/debug/device`.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::ports::DeviceProbe;
use crate::store::StatusStore;

/// How often device info is refreshed.
pub const DEVICE_INTERVAL: Duration = Duration::from_secs(30);

/// Take one sample and store it.
pub fn sample_into<D: DeviceProbe>(probe: &mut D, store: &StatusStore) {
    store.update_device_info(probe.sample());
}

/// Sample immediately, then every `period`, forever.
pub async fn run_device_monitor<D: DeviceProbe>(
    mut probe: D,
    store: Arc<StatusStore>,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        sample_into(&mut probe, &store);
        tracing::trace!("device info refreshed");
    }
}

#[cfg(test)]
mod tests {
    use infopanel_domain::diagnostics::DeviceInfo;

    use super::*;

    struct CountingProbe {
        samples: usize,
    }

    impl DeviceProbe for CountingProbe {
        fn sample(&mut self) -> DeviceInfo {
            self.samples += 1;
            DeviceInfo {
                uptime: format!("{}s", self.samples),
                num_cpu: 2,
                ..DeviceInfo::default()
            }
        }
    }

    #[test]
    fn should_store_each_sample() {
        let store = StatusStore::new();
        let mut probe = CountingProbe { samples: 0 };
        sample_into(&mut probe, &store);
        sample_into(&mut probe, &store);
        let device = store.debug_data().device;
        assert_eq!(device.uptime, "2s");
        assert_eq!(device.num_cpu, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn should_sample_immediately_on_start() {
        let store = Arc::new(StatusStore::new());
        let handle = tokio::spawn(run_device_monitor(
            CountingProbe { samples: 0 },
            Arc::clone(&store),
            DEVICE_INTERVAL,
        ));
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.abort();
        assert_eq!(store.debug_data().device.uptime, "1s");
    }
}
