//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`InfoPanelError`] via `#[from]` (no `String` variants at this level).

/// Top-level error shared by ports and services.
#[derive(Debug, thiserror::Error)]
pub enum InfoPanelError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// An upstream source (HTTP API, remote status endpoint) failed.
    #[error(transparent)]
    Source(Box<dyn std::error::Error + Send + Sync>),
}

/// Rejected input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid hex color {0:?}")]
    InvalidHexColor(String),

    #[error("tuning value {value} outside {min}..={max}")]
    TuningOutOfRange { value: i64, min: i64, max: i64 },

    #[error("tuning controls are disabled")]
    TuningDisabled,
}

/// A looked-up item does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Render an error and its chain of sources as `outer: inner: root`.
#[must_use]
pub fn report(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_validation_error_into_top_level() {
        let err: InfoPanelError = ValidationError::TuningDisabled.into();
        assert!(matches!(
            err,
            InfoPanelError::Validation(ValidationError::TuningDisabled)
        ));
    }

    #[test]
    fn should_display_not_found_error() {
        let err = NotFoundError {
            entity: "Stop",
            id: "E2185".to_string(),
        };
        assert_eq!(err.to_string(), "Stop E2185 not found");
    }

    #[test]
    fn should_report_full_source_chain() {
        #[derive(Debug, thiserror::Error)]
        #[error("request failed")]
        struct Outer(#[source] std::io::Error);

        let err = InfoPanelError::Source(Box::new(Outer(std::io::Error::other("timed out"))));
        assert_eq!(report(&err), "request failed: timed out");
    }

    #[test]
    fn should_display_out_of_range_error() {
        let err = ValidationError::TuningOutOfRange {
            value: 99,
            min: 8,
            max: 40,
        };
        assert_eq!(err.to_string(), "tuning value 99 outside 8..=40");
    }
}
