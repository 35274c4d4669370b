//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use infopanel_domain::error::{InfoPanelError, ValidationError, report};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`InfoPanelError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(InfoPanelError);

impl From<InfoPanelError> for ApiError {
    fn from(err: InfoPanelError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            InfoPanelError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            InfoPanelError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            InfoPanelError::Source(_) => {
                tracing::error!(error = %report(&self.0), "upstream error");
                (StatusCode::BAD_GATEWAY, "upstream unavailable".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
