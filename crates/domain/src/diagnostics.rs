//! Diagnostics records exposed on `/api/debug/*`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Number of API calls kept in the timeline.
pub const API_CALL_CAPACITY: usize = 50;

/// Number of log lines kept in memory.
pub const LOG_CAPACITY: usize = 100;

/// Outcome of one upstream fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Success,
    Error,
}

/// One entry of the upstream call timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiCallLog {
    pub timestamp: Timestamp,
    /// Human readable, e.g. `412.5ms`.
    pub duration: String,
    /// Name of the source that was fetched (`Electricity`, `FMI`, `HSL`).
    pub source: String,
    pub status: CallStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiCallLog {
    /// Build a timeline entry from a finished fetch.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        started: Timestamp,
        elapsed: Duration,
        error: Option<String>,
    ) -> Self {
        Self {
            timestamp: started,
            duration: format!("{elapsed:?}"),
            source: source.into(),
            status: if error.is_some() {
                CallStatus::Error
            } else {
                CallStatus::Success
            },
            error,
        }
    }
}

/// A captured log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: Timestamp,
    pub message: String,
}

/// Process and host statistics, refreshed periodically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub uptime: String,
    pub worker_threads: usize,
    pub alive_tasks: usize,
    pub process_memory: String,
    pub system_memory: String,
    pub num_cpu: usize,
}

/// Copy of every diagnostics buffer at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugData {
    pub api_calls: Vec<ApiCallLog>,
    pub app_logs: Vec<LogEntry>,
    pub device: DeviceInfo,
}

/// Format an uptime as `1h2m3s`, omitting leading zero units.
#[must_use]
pub fn format_uptime(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    match (hours, minutes) {
        (0, 0) => format!("{seconds}s"),
        (0, _) => format!("{minutes}m{seconds}s"),
        _ => format!("{hours}h{minutes}m{seconds}s"),
    }
}

/// Format a byte count as whole MiB.
#[must_use]
pub fn format_mib(bytes: u64) -> String {
    format!("{} MiB", bytes / 1024 / 1024)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn should_mark_call_as_success_without_error() {
        let log = ApiCallLog::new("HSL", Utc::now(), Duration::from_millis(12), None);
        assert_eq!(log.status, CallStatus::Success);
        assert_eq!(log.duration, "12ms");
        assert_eq!(log.source, "HSL");
    }

    #[test]
    fn should_mark_call_as_error_with_message() {
        let log = ApiCallLog::new(
            "FMI",
            Utc::now(),
            Duration::from_secs(1),
            Some("FMI api returned status: 503".to_string()),
        );
        assert_eq!(log.status, CallStatus::Error);
        assert_eq!(log.error.as_deref(), Some("FMI api returned status: 503"));
    }

    #[test]
    fn should_omit_error_field_when_serializing_success() {
        let log = ApiCallLog::new("HSL", Utc::now(), Duration::from_millis(1), None);
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["status"], "success");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn should_format_uptime_units() {
        assert_eq!(format_uptime(Duration::from_secs(42)), "42s");
        assert_eq!(format_uptime(Duration::from_secs(125)), "2m5s");
        assert_eq!(format_uptime(Duration::from_secs(3 * 3600 + 7)), "3h0m7s");
    }

    #[test]
    fn should_format_mib() {
        assert_eq!(format_mib(5 * 1024 * 1024 + 10), "5 MiB");
        assert_eq!(format_mib(0), "0 MiB");
    }
}
