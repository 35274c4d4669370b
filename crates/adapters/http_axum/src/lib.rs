//! # infopanel-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **status API** (`/api/status`) and the diagnostics endpoints
//!   (`/api/debug/*`)
//! - Expose the last rendered dashboard view as JSON and the clock as an
//!   SSE stream
//! - Serve the **server-side-rendered dashboard**: charts are inline SVG,
//!   the page reloads itself through `<meta http-equiv="refresh">` and the
//!   tuning sliders are plain `<form>` elements (PRG pattern), so the page
//!   works with **zero JavaScript**
//!
//! ## Dependency rule
//! Depends on `infopanel-app` (store, dashboard service, ports) and
//! `infopanel-domain`. Never leaks axum types into the application layer.

pub mod api;
pub mod dashboard;
pub mod error;
pub mod router;
pub mod state;
