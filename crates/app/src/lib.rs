//! # infopanel-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DataSource`: one upstream collector (electricity, weather, transport)
//!   - `StatusProvider`: where the dashboard reads its snapshot from
//!   - `DeviceProbe`: host and runtime statistics for diagnostics
//! - Provide **in-process infrastructure** that doesn't need IO:
//!   - `StatusStore`: the shared snapshot plus diagnostics buffers
//!   - `poller`: periodic, logged fetching of a `DataSource`
//!   - `device`: periodic device sampling into the store
//! - Drive the **dashboard**: refresh loop, renderer, clock, tuning controls
//!
//! ## Dependency rule
//! Depends on `infopanel-domain` only (plus `tokio::sync`/`tokio::time`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod dashboard;
pub mod device;
pub mod poller;
pub mod ports;
pub mod store;
