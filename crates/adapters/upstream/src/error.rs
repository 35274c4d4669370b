//! Upstream adapter error types.

use infopanel_domain::error::InfoPanelError;

/// Errors raised while talking to an upstream API.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Transport-level failure (DNS, TLS, timeout, body read).
    #[error("request failed")]
    Http(#[source] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("{api} api returned status: {status}")]
    Status { api: &'static str, status: u16 },

    #[error("failed to decode {api} json")]
    Json {
        api: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode FMI XML")]
    Xml(#[from] quick_xml::Error),

    #[error("failed to decode FMI XML attribute")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// The geocoder found nothing for a stop code.
    #[error("no features found for code: {0}")]
    NoFeatures(String),

    #[error("unexpected gid format: {0}")]
    UnexpectedGid(String),

    #[error("HSL API key is missing")]
    MissingKey,
}

impl From<UpstreamError> for InfoPanelError {
    fn from(err: UpstreamError) -> Self {
        InfoPanelError::Source(Box::new(err))
    }
}
