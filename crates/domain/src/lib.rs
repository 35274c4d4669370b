//! # infopanel-domain
//!
//! Pure domain model for the infopanel home information display.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define the **status snapshot** served on `/api/status` (electricity
//!   prices, transport departures, weather forecast)
//! - Define **diagnostics** records (API call timeline, captured logs,
//!   device statistics)
//! - Implement the **color ramp** used to color chart series
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod color;
pub mod diagnostics;
pub mod status;
