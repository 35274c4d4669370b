//! Device port: host and runtime statistics.

use infopanel_domain::diagnostics::DeviceInfo;

/// Samples process and host statistics.
///
/// Implementations may keep state between samples (e.g. a system handle
/// that is refreshed in place), hence `&mut self`.
pub trait DeviceProbe: Send {
    fn sample(&mut self) -> DeviceInfo;
}
