//! Dashboard: refresh loop, renderer, clock and tuning controls.
//!
//! The refresh loop caches one [`StatusSnapshot`](infopanel_domain::status::StatusSnapshot)
//! at a time and renders it into a [`DashboardView`]: a framework-free
//! description of every panel and chart. Adapters turn the view into HTML,
//! SVG or JSON; nothing here knows about markup.

pub mod clock;
pub mod legend;
pub mod render;
pub mod service;
pub mod tuning;
pub mod view;

pub use clock::{Clock, ClockReading};
pub use service::{DashboardService, RenderState};
pub use tuning::Tuning;
pub use view::DashboardView;
