//! Shared application state for axum handlers.

use std::sync::Arc;

use infopanel_app::dashboard::{Clock, DashboardService};
use infopanel_app::ports::StatusProvider;
use infopanel_app::store::StatusStore;

/// Matches the dashboard refresh loop.
pub const DEFAULT_PAGE_REFRESH_SECS: u64 = 60;

/// Application state shared across all axum handlers.
///
/// Generic over the dashboard's snapshot provider to avoid dynamic dispatch.
/// `Clone` is implemented manually so `P` does not need to be `Clone`.
pub struct AppState<P> {
    /// Snapshot and diagnostics buffers filled by the pollers.
    pub store: Arc<StatusStore>,
    /// Refresh loop, last rendered view and tuning controls.
    pub dashboard: Arc<DashboardService<P>>,
    pub clock: Arc<Clock>,
    /// Effective configuration with secrets masked, for `/api/debug/status`.
    pub debug_config: Arc<serde_json::Value>,
    /// How often the dashboard page reloads itself.
    pub page_refresh_secs: u64,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            dashboard: Arc::clone(&self.dashboard),
            clock: Arc::clone(&self.clock),
            debug_config: Arc::clone(&self.debug_config),
            page_refresh_secs: self.page_refresh_secs,
        }
    }
}

impl<P> AppState<P>
where
    P: StatusProvider + 'static,
{
    /// Create the state from components already shared with background tasks.
    pub fn new(
        store: Arc<StatusStore>,
        dashboard: Arc<DashboardService<P>>,
        clock: Arc<Clock>,
        debug_config: serde_json::Value,
    ) -> Self {
        Self {
            store,
            dashboard,
            clock,
            debug_config: Arc::new(debug_config),
            page_refresh_secs: DEFAULT_PAGE_REFRESH_SECS,
        }
    }

    /// Override the dashboard page reload interval.
    #[must_use]
    pub fn with_page_refresh_secs(mut self, secs: u64) -> Self {
        self.page_refresh_secs = secs;
        self
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// State whose dashboard reads straight from its own store.
    pub(crate) fn test_state(tuning_enabled: bool) -> AppState<Arc<StatusStore>> {
        let store = Arc::new(StatusStore::new());
        let dashboard = Arc::new(DashboardService::new(Arc::clone(&store), tuning_enabled));
        AppState::new(
            store,
            dashboard,
            Arc::new(Clock::new()),
            serde_json::json!({
                "upstream": { "hsl_api_key": "***MASKED***" },
                "dashboard": { "tuning_controls": tuning_enabled },
            }),
        )
    }

    #[test]
    fn should_share_components_between_clones() {
        let state = test_state(false);
        let copy = state.clone();
        assert!(Arc::ptr_eq(&state.store, &copy.store));
        assert!(Arc::ptr_eq(&state.dashboard, &copy.dashboard));
    }
}
