//! Periodic polling of upstream sources.
//!
//! Every fetch goes through [`LoggedSource`], which records the outcome in
//! the store's API call timeline before the update is applied.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::MissedTickBehavior;

use infopanel_domain::diagnostics::ApiCallLog;
use infopanel_domain::error::{InfoPanelError, report};
use infopanel_domain::time::now;

use crate::ports::{DataSource, SourceUpdate};
use crate::store::StatusStore;

/// A [`DataSource`] whose every fetch is timed and recorded.
pub struct LoggedSource<S> {
    source: S,
    store: Arc<StatusStore>,
}

impl<S: DataSource> LoggedSource<S> {
    pub fn new(source: S, store: Arc<StatusStore>) -> Self {
        Self { source, store }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.source.name()
    }

    /// Fetch from the wrapped source and append an entry to the timeline.
    ///
    /// # Errors
    ///
    /// Returns the wrapped source's error unchanged.
    pub async fn fetch(&self) -> Result<SourceUpdate, InfoPanelError> {
        let started = now();
        let clock = Instant::now();
        let result = self.source.fetch().await;
        let error = result.as_ref().err().map(|err| report(err));
        self.store
            .add_api_call(ApiCallLog::new(self.name(), started, clock.elapsed(), error));
        result
    }

    /// Fetch once and apply the result to the store.
    ///
    /// # Errors
    ///
    /// Returns the source error; the store is left untouched in that case.
    pub async fn poll_once(&self) -> Result<(), InfoPanelError> {
        let update = self.fetch().await?;
        self.store.apply(update);
        Ok(())
    }
}

/// Poll `source` immediately and then every `period`, forever.
///
/// Failures are logged and the loop waits for the next tick.
pub async fn run_poller<S: DataSource>(source: LoggedSource<S>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        match source.poll_once().await {
            Ok(()) => tracing::debug!(source = source.name(), "source updated"),
            Err(err) => tracing::error!(
                source = source.name(),
                error = %report(&err),
                "error fetching data"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::Mutex;

    use infopanel_domain::diagnostics::CallStatus;
    use infopanel_domain::error::NotFoundError;
    use infopanel_domain::status::ElectricityData;

    use super::*;

    struct StubSource {
        results: Mutex<Vec<Result<SourceUpdate, InfoPanelError>>>,
    }

    impl StubSource {
        fn new(results: Vec<Result<SourceUpdate, InfoPanelError>>) -> Self {
            Self {
                results: Mutex::new(results),
            }
        }
    }

    impl DataSource for StubSource {
        fn name(&self) -> &'static str {
            "Stub"
        }

        fn fetch(&self) -> impl Future<Output = Result<SourceUpdate, InfoPanelError>> + Send {
            let next = self.results.lock().unwrap().remove(0);
            async move { next }
        }
    }

    fn price(value: f64) -> SourceUpdate {
        SourceUpdate::Electricity(ElectricityData {
            current_price: Some(value),
            ..ElectricityData::default()
        })
    }

    fn failure() -> InfoPanelError {
        NotFoundError {
            entity: "Stop",
            id: "E0000".to_string(),
        }
        .into()
    }

    #[tokio::test]
    async fn should_apply_update_and_record_success() {
        let store = Arc::new(StatusStore::new());
        let source = LoggedSource::new(StubSource::new(vec![Ok(price(9.5))]), Arc::clone(&store));

        source.poll_once().await.unwrap();

        assert_eq!(store.snapshot().electricity.current_price, Some(9.5));
        let calls = store.debug_data().api_calls;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].source, "Stub");
        assert_eq!(calls[0].status, CallStatus::Success);
    }

    #[tokio::test]
    async fn should_record_failure_and_keep_previous_data() {
        let store = Arc::new(StatusStore::new());
        let source = LoggedSource::new(
            StubSource::new(vec![Ok(price(3.0)), Err(failure())]),
            Arc::clone(&store),
        );

        source.poll_once().await.unwrap();
        assert!(source.poll_once().await.is_err());

        assert_eq!(store.snapshot().electricity.current_price, Some(3.0));
        let calls = store.debug_data().api_calls;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].status, CallStatus::Error);
        assert_eq!(calls[1].error.as_deref(), Some("not found: Stop E0000 not found"));
    }
}
