use serde::Serialize;
use serde_json::Value;
use typeshare::typeshare;
use url::Url;

#[cfg(feature = "reqwest")]
mod reqwest_transport;

#[cfg(doc)]
use crate::Client;

/// The `Content-Type` of every request sent to the Relying Party.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// The `Accept` header of every request sent to the Relying Party.
pub const JSON_ACCEPT: &str = "application/json";

/// Failures of the request itself, as opposed to the Relying Party refusing it.
#[typeshare]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "type", content = "content")]
pub enum TransportError {
    /// The request could not be sent, or the response could not be received.
    #[error("network error: {0}")]
    Network(String),
    /// The body of the response is not JSON.
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),
    /// The Relying Party answered with a status outside of `2xx` and no `fail` member.
    #[error("unexpected HTTP status {0}")]
    Status(u16),
}

/// What came back from the Relying Party, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The raw response body.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Whether the status is in the `2xx` range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A way of sending JSON to the Relying Party, used by the [`Client`] for both endpoints.
///
/// The implementer should take the following into consideration:
/// * Send the body with a `Content-Type` of [`JSON_CONTENT_TYPE`]
/// * Set the `Accept` header to [`JSON_ACCEPT`]
/// * Return non-`2xx` responses as a [`TransportResponse`], not as an error, the client decides
///   what they mean
#[cfg_attr(any(test, feature = "testable"), mockall::automock)]
#[async_trait::async_trait]
pub trait RelyingPartyTransport {
    /// POST `body` to `url` and hand back the response.
    async fn post_json(&self, url: &Url, body: &Value) -> Result<TransportResponse, TransportError>;
}
