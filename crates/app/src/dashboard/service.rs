//! Dashboard refresh loop and tuning controls.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::time::MissedTickBehavior;

use infopanel_domain::color::ColorProfile;
use infopanel_domain::error::{InfoPanelError, ValidationError, report};
use infopanel_domain::status::StatusSnapshot;
use infopanel_domain::time::now;

use super::render::render;
use super::tuning::{self, Tuning};
use super::view::DashboardView;
use crate::ports::StatusProvider;

/// Everything a render depends on.
#[derive(Debug, Default)]
pub struct RenderState {
    /// Last snapshot received; `None` until the first successful refresh.
    pub snapshot: Option<StatusSnapshot>,
    pub tuning: Tuning,
    pub view: Option<Arc<DashboardView>>,
}

impl RenderState {
    /// Render the cached snapshot, if any, and remember the result.
    fn rerender(&mut self, profile: &ColorProfile) -> Option<Arc<DashboardView>> {
        let snapshot = self.snapshot.as_ref()?;
        let view = Arc::new(render(snapshot, &self.tuning, profile, now()));
        self.view = Some(Arc::clone(&view));
        Some(view)
    }
}

/// Owns the cached snapshot and publishes a new view after every render.
///
/// Refresh renders and tuning re-renders take the same lock, so they never
/// interleave.
pub struct DashboardService<P> {
    provider: P,
    profile: ColorProfile,
    tuning_enabled: bool,
    state: Mutex<RenderState>,
    views: watch::Sender<Option<Arc<DashboardView>>>,
}

impl<P: StatusProvider> DashboardService<P> {
    pub fn new(provider: P, tuning_enabled: bool) -> Self {
        let (views, _) = watch::channel(None);
        Self {
            provider,
            profile: ColorProfile::DEFAULT,
            tuning_enabled,
            state: Mutex::new(RenderState::default()),
            views,
        }
    }

    #[must_use]
    pub fn tuning_enabled(&self) -> bool {
        self.tuning_enabled
    }

    /// Fetch a new snapshot, cache it and render it.
    ///
    /// # Errors
    ///
    /// Returns the provider error; the cached snapshot and view are kept.
    pub async fn refresh(&self) -> Result<Arc<DashboardView>, InfoPanelError> {
        let snapshot = self.provider.status().await?;
        let mut state = self.state.lock().await;
        let view = Arc::new(render(&snapshot, &state.tuning, &self.profile, now()));
        state.snapshot = Some(snapshot);
        state.view = Some(Arc::clone(&view));
        self.views.send_replace(Some(Arc::clone(&view)));
        Ok(view)
    }

    /// One refresh tick; failures are logged and swallowed.
    pub async fn tick(&self) {
        match self.refresh().await {
            Ok(view) => tracing::debug!(rendered_at = %view.rendered_at, "dashboard refreshed"),
            Err(err) => tracing::error!(error = %report(&err), "error refreshing dashboard"),
        }
    }

    /// Refresh immediately, then every `period`, forever.
    pub async fn run(self: Arc<Self>, period: Duration) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }

    /// The last rendered view, `None` before the first successful refresh.
    #[must_use]
    pub fn view(&self) -> Option<Arc<DashboardView>> {
        self.views.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<DashboardView>>> {
        self.views.subscribe()
    }

    pub async fn tuning(&self) -> Tuning {
        self.state.lock().await.tuning
    }

    fn ensure_enabled(&self) -> Result<(), ValidationError> {
        if self.tuning_enabled {
            Ok(())
        } else {
            Err(ValidationError::TuningDisabled)
        }
    }

    /// Change the chart font size and re-render from the cached snapshot.
    ///
    /// Returns the new view, or `None` when nothing has been fetched yet.
    ///
    /// # Errors
    ///
    /// Returns a validation error when tuning is disabled or `px` is out of range.
    pub async fn set_graph_font_size(
        &self,
        px: i64,
    ) -> Result<Option<Arc<DashboardView>>, InfoPanelError> {
        self.ensure_enabled()?;
        let size = tuning::graph_font_size(px)?;
        let mut state = self.state.lock().await;
        state.tuning.graph_font_size = size;
        let view = state.rerender(&self.profile);
        if let Some(view) = &view {
            self.views.send_replace(Some(Arc::clone(view)));
        }
        tracing::info!(graph_font_size = size, "graph font size changed");
        Ok(view)
    }

    /// Change the bus list scale. Only the style variable changes.
    ///
    /// # Errors
    ///
    /// Returns a validation error when tuning is disabled or `percent` is out of range.
    pub async fn set_bus_font_scale(&self, percent: i64) -> Result<Tuning, InfoPanelError> {
        self.ensure_enabled()?;
        let scale = tuning::bus_font_scale(percent)?;
        let mut state = self.state.lock().await;
        state.tuning.bus_font_scale = scale;
        tracing::info!(bus_font_scale = scale, "bus font scale changed");
        Ok(state.tuning)
    }
}
