//! Remote snapshot provider.
//!
//! Lets a panel display the data collected by another instance.

use std::future::Future;

use infopanel_app::ports::StatusProvider;
use infopanel_domain::error::InfoPanelError;
use infopanel_domain::status::StatusSnapshot;

use crate::error::UpstreamError;

/// Reads `GET {base}/api/status`.
pub struct HttpStatusProvider {
    http: reqwest::Client,
    url: String,
}

impl HttpStatusProvider {
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            url: status_url(base_url),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and decode one snapshot.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] on transport failure, a non-200 status or
    /// a body that is not a snapshot.
    pub async fn fetch_status(&self) -> Result<StatusSnapshot, UpstreamError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(UpstreamError::Http)?;
        if !response.status().is_success() {
            return Err(UpstreamError::Status {
                api: "status",
                status: response.status().as_u16(),
            });
        }
        let body = response.bytes().await.map_err(UpstreamError::Http)?;
        serde_json::from_slice(&body).map_err(|source| UpstreamError::Json {
            api: "status",
            source,
        })
    }
}

impl StatusProvider for HttpStatusProvider {
    fn status(&self) -> impl Future<Output = Result<StatusSnapshot, InfoPanelError>> + Send {
        async move { Ok(self.fetch_status().await?) }
    }
}

/// Append `/api/status` to a base URL, tolerating a trailing slash.
#[must_use]
pub fn status_url(base_url: &str) -> String {
    format!("{}/api/status", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_append_status_path() {
        assert_eq!(
            status_url("http://panel.local:8080"),
            "http://panel.local:8080/api/status"
        );
        assert_eq!(
            status_url("http://panel.local:8080/"),
            "http://panel.local:8080/api/status"
        );
    }

    #[test]
    fn should_expose_resolved_url() {
        let provider = HttpStatusProvider::new(reqwest::Client::new(), "http://10.0.0.2");
        assert_eq!(provider.url(), "http://10.0.0.2/api/status");
    }
}
